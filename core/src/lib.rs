//! Bearer-token HTTP client core.
//!
//! # Overview
//! `AuthenticatedClient` reads a bearer token from a file once, attaches it
//! to every request, and exposes GET/POST/PUT/DELETE calls that always
//! return a normalized `ApiResponse`, never an error.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   the network round-trip sits behind the `Transport` trait, with a
//!   `ureq`-backed default.
//! - Configuration is explicit. Environment lookup belongs to the caller.
//! - A missing or empty token file is not fatal; the reason is kept as a
//!   `TokenError` for the caller to display.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod session;
pub mod token;
pub mod transport;

pub use client::AuthenticatedClient;
pub use config::{ClientConfig, API_BASE_URL_ENV, DEFAULT_TOKEN_FILE};
pub use error::{TokenError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use response::{normalize, ApiResponse};
pub use session::Session;
pub use token::load_token;
pub use transport::{Transport, UreqTransport};
