pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    MISSING_TOKEN_WARNING,
};
pub use models::{Config, ConfigMetadata, GithubConfig, ServerConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
