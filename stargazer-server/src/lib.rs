//! # Stargazer Server
//!
//! HTTP front end for batch star-count lookups. Exposes `POST /stars`,
//! `GET /health` and `GET /metrics`; all resolution work is delegated to
//! [`stargazer_core::StarAggregator`].

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;
