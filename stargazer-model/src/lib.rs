//! Data model definitions shared by the Stargazer server and client.
#![allow(missing_docs)]

pub mod error;
pub mod repo_name;
pub mod routes;
pub mod stars;

pub use error::ModelError;
pub use repo_name::RepoName;
pub use stars::{
    FAILED_STARS, NO_ERROR, RepoRequest, RepoStars, StarsRequest,
    StarsResponse,
};
