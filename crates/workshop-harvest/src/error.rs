//! Error types for the harvesting pipeline.

/// All errors that can occur while harvesting identifiers.
///
/// Per-URL variants (`HttpStatus`, `Network`, `DescriptionNotFound`,
/// `MissingItemId`) are recovered by the harvester and never end a run.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("no workshop item description found on {0}")]
    DescriptionNotFound(String),

    #[error("no numeric item id in {0}")]
    MissingItemId(String),

    #[error("empty item reference")]
    EmptyReference,

    #[error("{0} was already entered")]
    DuplicateReference(String),

    #[error("{url} does not start with {prefix}")]
    ForeignHost { url: String, prefix: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
