//! # gc-api
//!
//! HTTP service built on the GoCardless client.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/webhook/gocardless` | Signed webhook deliveries |
//! | GET | `/api/v1/payouts/{id}/reconciliation` | Payments and refunds in a payout |
//! | GET | `/api/v1/events/{id}` | Event, `?include_resources=true` to expand links |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
