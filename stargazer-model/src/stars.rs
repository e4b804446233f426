//! Request and response bodies for `POST /stars`.

/// Star count reported for an item that could not be resolved.
pub const FAILED_STARS: i64 = -1;

/// Error text reported for an item that resolved successfully.
pub const NO_ERROR: &str = "<nil>";

/// Batch request: `{"repos": [{"name": "owner/repo"}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarsRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub repos: Vec<RepoRequest>,
}

impl StarsRequest {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repos: names
                .into_iter()
                .map(|name| RepoRequest { name: name.into() })
                .collect(),
        }
    }

    /// Raw identifiers in request order.
    pub fn names(&self) -> Vec<String> {
        self.repos.iter().map(|repo| repo.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepoRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
}

/// Batch response, index-aligned with the originating [`StarsRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarsResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub repos: Vec<RepoStars>,
}

/// One row of a [`StarsResponse`]. Both `Stars` and `Error` are always
/// present on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepoStars {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "Stars"))]
    pub stars: i64,
    #[cfg_attr(feature = "serde", serde(rename = "Error"))]
    pub error: String,
}

impl RepoStars {
    pub fn success(name: impl Into<String>, stars: u64) -> Self {
        Self {
            name: name.into(),
            stars: i64::try_from(stars).unwrap_or(i64::MAX),
            error: NO_ERROR.to_string(),
        }
    }

    pub fn failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stars: FAILED_STARS,
            error: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.stars != FAILED_STARS
    }

    /// Star count as text, or the failure reason when the item failed.
    pub fn display_value(&self) -> String {
        if self.is_success() {
            self.stars.to_string()
        } else {
            self.error.clone()
        }
    }
}
