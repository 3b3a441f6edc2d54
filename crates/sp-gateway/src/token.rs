//! # Token Lifecycle
//!
//! Acquires, caches and validates gateway bearer tokens.
//!
//! A cached token is reused until it expires. When a fresh token is needed,
//! exactly one authentication request is in flight at a time: callers that
//! arrive while it is pending attach to it and receive the same outcome.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;
use serde_json::json;
use sp_core::{token_url, Clock, Credentials, PaymentError, PaymentResult, Token, Transport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, Level};

use crate::report::Reporter;

const AUTH_FAILURE_MESSAGE: &str =
    "Did not receive auth token from shurjopay. Check your credentials.";

type PendingAuth = Shared<BoxFuture<'static, PaymentResult<Token>>>;

#[derive(Default)]
struct TokenState {
    cached: Option<Token>,
    pending: Option<PendingAuth>,
}

/// Outcome of inspecting the state under the lock
enum Acquire {
    Ready(Token),
    Wait(PendingAuth),
}

/// Owns the authentication state for one set of merchant credentials.
pub struct TokenManager {
    credentials: Arc<Credentials>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn Reporter>,
    state: Mutex<TokenState>,
}

impl TokenManager {
    pub fn new(
        credentials: Arc<Credentials>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            credentials,
            transport,
            clock,
            reporter,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Whether `token` is still inside its validity window
    pub fn is_valid(&self, token: &Token) -> bool {
        token.is_valid(self.clock.as_ref())
    }

    /// The currently cached token, valid or not
    pub fn cached(&self) -> Option<Token> {
        self.lock().cached.clone()
    }

    /// Return the cached token while it is valid, otherwise authenticate.
    pub async fn get_valid_token(&self) -> PaymentResult<Token> {
        let pending = match self.acquire() {
            Acquire::Ready(token) => {
                debug!("Reusing cached shurjoPay token");
                return Ok(token);
            }
            Acquire::Wait(pending) => pending,
        };
        self.await_pending(pending).await
    }

    /// Fetch a new token from the gateway, replacing the cached one on success.
    ///
    /// Joins an authentication that is already in flight instead of starting
    /// a second one. On failure the previously cached token is kept.
    pub async fn authenticate(&self) -> PaymentResult<Token> {
        let pending = {
            let mut state = self.lock();
            self.join_or_start(&mut state)
        };
        self.await_pending(pending).await
    }

    fn acquire(&self) -> Acquire {
        let mut state = self.lock();
        if let Some(token) = state.cached.as_ref().filter(|t| self.is_valid(t)) {
            return Acquire::Ready(token.clone());
        }
        Acquire::Wait(self.join_or_start(&mut state))
    }

    fn join_or_start(&self, state: &mut TokenState) -> PendingAuth {
        if let Some(pending) = &state.pending {
            debug!("Joining in-flight shurjoPay authentication");
            return pending.clone();
        }

        let pending = request_token(
            Arc::clone(&self.credentials),
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
            Arc::clone(&self.reporter),
        )
        .boxed()
        .shared();
        state.pending = Some(pending.clone());
        pending
    }

    async fn await_pending(&self, pending: PendingAuth) -> PaymentResult<Token> {
        let outcome = pending.clone().await;

        // First waiter to finish settles the slot; later ones find it already cleared.
        let mut state = self.lock();
        if state.pending.as_ref().is_some_and(|p| p.ptr_eq(&pending)) {
            state.pending = None;
            if let Ok(token) = &outcome {
                state.cached = Some(token.clone());
            }
        }

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[instrument(skip_all, fields(root_url = %credentials.root_url()))]
async fn request_token(
    credentials: Arc<Credentials>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn Reporter>,
) -> PaymentResult<Token> {
    let body = json!({
        "username": credentials.merchant_username(),
        "password": credentials.merchant_password(),
    });

    let outcome = match transport.post(&token_url(&credentials), &body, &[]).await {
        Ok(response) => serde_json::from_value::<AuthResponse>(response)
            .map_err(|e| PaymentError::Authentication(format!("malformed auth response: {}", e)))
            .and_then(|auth| auth.into_token(clock.now())),
        Err(e) => Err(PaymentError::Authentication(e.to_string())),
    };

    match &outcome {
        Ok(token) => info!(ttl_seconds = token.ttl_seconds, "Received shurjoPay token"),
        Err(e) => reporter.log(Level::ERROR, &format!("{} ({})", AUTH_FAILURE_MESSAGE, e)),
    }

    outcome
}

// =============================================================================
// shurjoPay API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(rename = "TokenCreateTime", default)]
    token_create_time: Option<String>,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
    #[serde(default)]
    execute_url: Option<String>,
    #[serde(default)]
    store_id: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthResponse {
    fn into_token(self, now: chrono::DateTime<chrono::Utc>) -> PaymentResult<Token> {
        let value = match self.token.filter(|t| !t.is_empty()) {
            Some(value) => value,
            None => {
                return Err(PaymentError::Authentication(
                    self.message
                        .unwrap_or_else(|| "auth response carried no token".to_string()),
                ))
            }
        };

        let ttl_seconds = self
            .expires_in
            .as_ref()
            .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok())))
            .ok_or_else(|| {
                PaymentError::Authentication("auth response carried no expires_in".to_string())
            })?;

        Ok(Token {
            value,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            created_at: now,
            ttl_seconds,
            execute_url: self.execute_url,
            store_id: self.store_id,
            issued_at: self.token_create_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use sp_core::{Headers, ManualClock};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Token endpoint double: counts calls, optionally blocks until released.
    struct FakeAuth {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail: bool,
    }

    impl FakeAuth {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FakeAuth {
        async fn post(&self, _url: &str, _body: &Value, _headers: &Headers) -> PaymentResult<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(PaymentError::Gateway {
                    status: Some(401),
                    message: "Unauthorized".into(),
                });
            }
            Ok(json!({
                "token": format!("tok-{}", n),
                "token_type": "Bearer",
                "TokenCreateTime": "2024-01-01 10:00:00am",
                "expires_in": 3600,
                "execute_url": "https://sandbox.shurjopayment.com/api/secret-pay",
                "store_id": 1
            }))
        }
    }

    #[derive(Default)]
    struct CollectingReporter(Mutex<Vec<String>>);

    impl Reporter for CollectingReporter {
        fn log(&self, _level: Level, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn manager(
        transport: Arc<FakeAuth>,
        clock: Arc<ManualClock>,
        reporter: Arc<CollectingReporter>,
    ) -> TokenManager {
        let credentials = Credentials::configure(
            "https://sandbox.shurjopayment.com",
            "sp_sandbox",
            "secret",
            "NOK",
            "https://shop.example.com/return",
        )
        .unwrap();
        TokenManager::new(Arc::new(credentials), transport, clock, reporter)
    }

    #[tokio::test]
    async fn test_reuses_token_until_expiry() {
        let transport = Arc::new(FakeAuth::ok());
        let clock = Arc::new(ManualClock::default());
        let tokens = manager(transport.clone(), clock.clone(), Arc::default());

        let first = tokens.get_valid_token().await.unwrap();
        clock.advance(1000);
        let second = tokens.get_valid_token().await.unwrap();
        assert_eq!(transport.calls(), 1);
        assert_eq!(first.value, second.value);

        clock.advance(2700);
        let third = tokens.get_valid_token().await.unwrap();
        assert_eq!(transport.calls(), 2);
        assert_eq!(third.value, "tok-2");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_authentication() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(FakeAuth {
            gate: Some(gate.clone()),
            ..FakeAuth::ok()
        });
        let tokens = manager(transport.clone(), Arc::new(ManualClock::default()), Arc::default());

        let waiters = futures::future::join_all((0..5).map(|_| tokens.get_valid_token()));
        let release = async {
            tokio::task::yield_now().await;
            gate.notify_one();
        };
        let (results, ()) = tokio::join!(waiters, release);

        assert_eq!(transport.calls(), 1);
        for result in results {
            assert_eq!(result.unwrap().value, "tok-1");
        }
        assert!(tokens.cached().is_some());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_token_and_reports() {
        let transport = Arc::new(FakeAuth {
            fail: true,
            ..FakeAuth::ok()
        });
        let reporter = Arc::new(CollectingReporter::default());
        let tokens = manager(transport.clone(), Arc::new(ManualClock::default()), reporter.clone());

        let err = tokens.get_valid_token().await.unwrap_err();

        assert!(matches!(err, PaymentError::Authentication(_)));
        assert!(tokens.cached().is_none());
        let logged = reporter.0.lock().unwrap();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].starts_with(AUTH_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_cached_token() {
        let clock = Arc::new(ManualClock::default());
        let healthy = Arc::new(FakeAuth::ok());
        let tokens = manager(healthy, clock.clone(), Arc::default());
        let original = tokens.get_valid_token().await.unwrap();

        // Same cached state, but the token endpoint now rejects us.
        let failing = Arc::new(FakeAuth {
            fail: true,
            ..FakeAuth::ok()
        });
        let stale = TokenManager {
            transport: failing,
            ..tokens
        };
        clock.advance(4000);

        assert!(stale.get_valid_token().await.is_err());
        assert_eq!(stale.cached().map(|t| t.value), Some(original.value));
    }

    #[test]
    fn test_auth_response_without_token_is_rejected() {
        let response: AuthResponse =
            serde_json::from_value(json!({ "sp_code": "1064", "message": "Invalid credentials" }))
                .unwrap();

        match response.into_token(chrono::Utc::now()) {
            Err(PaymentError::Authentication(msg)) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_response_accepts_string_ttl() {
        let response: AuthResponse = serde_json::from_value(json!({
            "token": "abc",
            "token_type": "Bearer",
            "expires_in": "3600"
        }))
        .unwrap();

        let token = response.into_token(chrono::Utc::now()).unwrap();
        assert_eq!(token.ttl_seconds, 3600);
        assert_eq!(token.execute_url, None);
    }
}
