//! Route paths served by `stargazer-server`.

pub const STARS: &str = "/stars";
pub const HEALTH: &str = "/health";
pub const METRICS: &str = "/metrics";
