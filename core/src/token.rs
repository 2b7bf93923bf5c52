//! Bearer token loading.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::TokenError;

/// Read a bearer token from `path`, trimming surrounding whitespace.
///
/// Never panics: a missing file, a whitespace-only file, or any read error is
/// reported as a `TokenError` for the caller to log or display.
pub fn load_token(path: impl AsRef<Path>) -> Result<String, TokenError> {
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TokenError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(TokenError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let token = contents.trim();
    if token.is_empty() {
        return Err(TokenError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(token.to_string())
}
