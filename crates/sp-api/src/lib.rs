//! # sp-api
//!
//! HTTP API layer for the shurjoPay gateway client.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for checkout, verification and status
//! - The return page customers land on after paying
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/checkout` | Create checkout session |
//! | GET | `/api/v1/payments/{order_id}/verify` | Verify payment |
//! | GET | `/api/v1/payments/{order_id}/status` | Payment status |
//! | GET | `/return` | Customer return page |

pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
