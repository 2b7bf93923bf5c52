//! Error types for the authenticated client.
//!
//! # Design
//! Neither error ever escapes a verb call. `TokenError` is the diagnostic
//! kept by the client when no token could be loaded; `TransportError` is
//! what a `Transport` reports when no HTTP response came back at all, and it
//! is folded into `ApiResponse::RequestFailed` at the call boundary.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why the bearer token could not be loaded.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("token file '{}' is empty", path.display())]
    Empty { path: PathBuf },

    #[error("error reading token file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TokenError {
    pub fn path(&self) -> &Path {
        match self {
            TokenError::NotFound { path } | TokenError::Empty { path } | TokenError::Read { path, .. } => path,
        }
    }
}

/// A request that produced no HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            err @ ureq::Error::Timeout(_) => TransportError::Timeout(err.to_string()),
            ureq::Error::Io(e) => TransportError::Io(e),
            other => TransportError::Other(other.to_string()),
        }
    }
}
