//! A transport plus the headers attached to every request sent through it.

use crate::http::find_header;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct Session<T> {
    transport: T,
    default_headers: Vec<(String, String)>,
}

impl<T> Session<T> {
    /// A session with no default headers. Requests go out unauthenticated.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            default_headers: Vec::new(),
        }
    }

    /// A session sending `Authorization: Bearer <token>` and a JSON content
    /// type on every request.
    pub fn with_bearer_token(transport: T, token: &str) -> Self {
        Self {
            transport,
            default_headers: vec![
                (AUTHORIZATION.to_string(), format!("Bearer {token}")),
                (CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.default_headers, name)
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
