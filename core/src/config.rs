//! Client configuration.
//!
//! The client never reads the environment itself. Callers resolve the base
//! URL with `ClientConfig::resolve`, passing whatever environment value they
//! looked up (the CLI reads `API_BASE_URL` after loading `.env`).

use std::path::{Path, PathBuf};

/// Token file used when none is given.
pub const DEFAULT_TOKEN_FILE: &str = "token.txt";

/// Environment variable consulted for the base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    token_file: PathBuf,
    base_url: String,
}

impl ClientConfig {
    pub fn new(token_file: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            token_file: token_file.into(),
            base_url: base_url.into(),
        }
    }

    /// Pick the base URL from an explicit value, falling back to an
    /// environment value and then to the empty string.
    ///
    /// An explicit empty string counts as "not given".
    pub fn resolve(
        token_file: impl Into<PathBuf>,
        explicit_base_url: Option<&str>,
        env_base_url: Option<&str>,
    ) -> Self {
        let base_url = explicit_base_url
            .filter(|url| !url.is_empty())
            .or(env_base_url)
            .unwrap_or_default();
        Self::new(token_file, base_url)
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE, "")
    }
}
