//! HTTP request handlers organized by functionality

pub mod fallback;
pub mod health;
pub mod metrics;
pub mod stars;

pub use fallback::{method_not_supported, not_found};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use stars::{stars_handler, stars_method_not_supported};
