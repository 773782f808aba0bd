//! Error types for the `size-status` application.

use std::path::PathBuf;
use thiserror::Error;

/// A result type with [SizeError] as the error.
pub type SizeResult<T> = Result<T, SizeError>;

/// Fatal errors raised while resolving, encoding, or publishing an artifact's size.
#[derive(Error, Debug)]
pub enum SizeError {
    /// The API answered with a status code outside of `200..=299`.
    #[error("Request for {url} failed with status {status}: {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },
    /// The request never produced a response, or its body could not be decoded.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The base repository's statuses URL template did not contain the `{sha}` placeholder.
    #[error("Statuses URL `{url}` does not contain base SHA `{sha}`")]
    ContractViolation { sha: String, url: String },
    /// A status description did not end in `<number> bytes`.
    #[error("Unable to parse status description `{0}`")]
    MalformedDescription(String),
    /// The tracked artifact could not be inspected.
    #[error("Unable to read artifact `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
