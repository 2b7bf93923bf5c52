//! Bearer-token HTTP client.
//!
//! # Design
//! `AuthenticatedClient` loads its token once at construction and never
//! touches it again. Each verb is split the same way: a `build_*` method
//! produces an `HttpRequest`, the session's `Transport` executes it, and
//! `normalize` shapes the result. Every verb returns an `ApiResponse`;
//! transport failures are converted at the call boundary, never returned as
//! `Err`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::TokenError;
use crate::http::{set_header, HttpMethod, HttpRequest, RequestBody};
use crate::response::{normalize, ApiResponse};
use crate::session::{Session, CONTENT_TYPE, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::token::load_token;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug)]
pub struct AuthenticatedClient<T = UreqTransport> {
    config: ClientConfig,
    token: Option<String>,
    token_diagnostic: Option<TokenError>,
    session: Session<T>,
}

impl AuthenticatedClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> AuthenticatedClient<T> {
    /// Build a client over `transport`. Never fails: when the token cannot be
    /// loaded the client is still usable, sends no `Authorization` header, and
    /// keeps the reason in `token_diagnostic`.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let (token, token_diagnostic) = match load_token(config.token_file()) {
            Ok(token) => (Some(token), None),
            Err(e) => {
                debug!(
                    error = %e,
                    path = %e.path().display(),
                    "no bearer token loaded; requests will be unauthenticated"
                );
                (None, Some(e))
            }
        };

        let session = match &token {
            Some(token) => Session::with_bearer_token(transport, token),
            None => Session::new(transport),
        };

        Self {
            config,
            token,
            token_diagnostic,
            session,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Why the token is absent, if it is.
    pub fn token_diagnostic(&self) -> Option<&TokenError> {
        self.token_diagnostic.as_ref()
    }

    pub fn token_file(&self) -> &Path {
        self.config.token_file()
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Join the base URL and `endpoint` with exactly one `/`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub fn build_get(&self, endpoint: &str, params: Option<&[(&str, &str)]>) -> HttpRequest {
        let mut request = self.build_request(HttpMethod::Get, endpoint, None, None);
        request.query = params
            .unwrap_or_default()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        request
    }

    pub fn build_post(&self, endpoint: &str, data: Option<&RequestBody>, json: Option<&Value>) -> HttpRequest {
        self.build_request(HttpMethod::Post, endpoint, data, json)
    }

    pub fn build_put(&self, endpoint: &str, data: Option<&RequestBody>, json: Option<&Value>) -> HttpRequest {
        self.build_request(HttpMethod::Put, endpoint, data, json)
    }

    pub fn build_delete(&self, endpoint: &str) -> HttpRequest {
        self.build_request(HttpMethod::Delete, endpoint, None, None)
    }

    pub fn get(&self, endpoint: &str, params: Option<&[(&str, &str)]>) -> ApiResponse {
        self.send(self.build_get(endpoint, params))
    }

    pub fn post(&self, endpoint: &str, data: Option<&RequestBody>, json: Option<&Value>) -> ApiResponse {
        self.send(self.build_post(endpoint, data, json))
    }

    pub fn put(&self, endpoint: &str, data: Option<&RequestBody>, json: Option<&Value>) -> ApiResponse {
        self.send(self.build_put(endpoint, data, json))
    }

    pub fn delete(&self, endpoint: &str) -> ApiResponse {
        self.send(self.build_delete(endpoint))
    }

    /// Execute a prebuilt request through the session and normalize the result.
    pub fn send(&self, request: HttpRequest) -> ApiResponse {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        match self.session.transport().execute(&request) {
            Ok(response) => {
                debug!(
                    status = response.status,
                    content_type = response.header(CONTENT_TYPE).unwrap_or_default(),
                    url = %request.url,
                    "received response"
                );
                normalize(&response)
            }
            Err(e) => {
                warn!(error = %e, url = %request.url, "request failed");
                ApiResponse::RequestFailed(e.to_string())
            }
        }
    }

    /// `data` wins when both bodies are given; the JSON body is dropped.
    fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        data: Option<&RequestBody>,
        json: Option<&Value>,
    ) -> HttpRequest {
        let mut headers = self.session.default_headers().to_vec();

        let body = match (data, json) {
            (Some(data), json) => {
                if json.is_some() {
                    debug!("both data and json bodies given; sending data");
                }
                match data {
                    RequestBody::Form(pairs) => {
                        set_header(&mut headers, CONTENT_TYPE, FORM_CONTENT_TYPE);
                        Some(
                            form_urlencoded::Serializer::new(String::new())
                                .extend_pairs(pairs)
                                .finish(),
                        )
                    }
                    RequestBody::Raw(raw) => Some(raw.clone()),
                }
            }
            (None, Some(json)) => {
                set_header(&mut headers, CONTENT_TYPE, JSON_CONTENT_TYPE);
                Some(json.to_string())
            }
            (None, None) => None,
        };

        HttpRequest {
            method,
            url: self.url_for(endpoint),
            query: Vec::new(),
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::{self, Write};

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    const BASE_URL: &str = "https://api.test.com";

    /// Records every request and answers with a canned reply.
    struct FakeTransport {
        requests: RefCell<Vec<HttpRequest>>,
        reply: fn() -> Result<HttpResponse, TransportError>,
    }

    impl FakeTransport {
        fn replying(reply: fn() -> Result<HttpResponse, TransportError>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                reply,
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request.clone());
            (self.reply)()
        }
    }

    fn ok_empty() -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, "{}"))
    }

    fn token_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn client_with<'a>(file: &NamedTempFile, transport: &'a FakeTransport) -> AuthenticatedClient<&'a FakeTransport> {
        AuthenticatedClient::with_transport(ClientConfig::new(file.path(), BASE_URL), transport)
    }

    #[test]
    fn valid_token_file_configures_session() {
        let file = token_file("test_token_12345");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        assert_eq!(client.token(), Some("test_token_12345"));
        assert_eq!(client.base_url(), BASE_URL);
        assert!(client.token_diagnostic().is_none());
        assert_eq!(client.session().header("Authorization"), Some("Bearer test_token_12345"));
        assert_eq!(client.session().header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn missing_token_file_leaves_client_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::new(dir.path().join("nonexistent_token.txt"), BASE_URL);
        let client = AuthenticatedClient::with_transport(config, FakeTransport::replying(ok_empty));

        assert_eq!(client.token(), None);
        assert!(!client.is_authenticated());
        assert_eq!(client.base_url(), BASE_URL);
        assert!(matches!(client.token_diagnostic(), Some(TokenError::NotFound { .. })));
        assert!(client.session().default_headers().is_empty());
    }

    #[test]
    fn whitespace_token_file_leaves_token_absent() {
        let file = token_file("   \n");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        assert_eq!(client.token(), None);
        assert!(matches!(client.token_diagnostic(), Some(TokenError::Empty { .. })));
    }

    #[test]
    fn unauthenticated_requests_are_still_sent() {
        let file = token_file("");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        let result = client.get("/api/test", None);
        assert_eq!(result, ApiResponse::Success(json!({})));
        assert_eq!(transport.last_request().header("Authorization"), None);
    }

    #[test]
    fn url_joining_uses_exactly_one_slash() {
        let file = token_file("t");
        let transport = FakeTransport::replying(ok_empty);

        let cases = [
            ("https://api.test.com", "api/test"),
            ("https://api.test.com", "/api/test"),
            ("https://api.test.com/", "api/test"),
            ("https://api.test.com/", "/api/test"),
            ("https://api.test.com///", "///api/test"),
        ];
        for (base, endpoint) in cases {
            let client = AuthenticatedClient::with_transport(ClientConfig::new(file.path(), base), &transport);
            assert_eq!(client.url_for(endpoint), "https://api.test.com/api/test", "{base} + {endpoint}");
        }
    }

    #[test]
    fn empty_base_url_targets_bare_endpoint() {
        let file = token_file("t");
        let transport = FakeTransport::replying(ok_empty);
        let client = AuthenticatedClient::with_transport(ClientConfig::new(file.path(), ""), &transport);
        assert_eq!(client.url_for("/api/test"), "/api/test");
        assert_eq!(client.url_for("api/test"), "/api/test");
    }

    #[test]
    fn get_success_returns_body_unchanged() {
        let file = token_file("test_token_12345");
        let transport = FakeTransport::replying(|| Ok(HttpResponse::new(200, r#"{"status":"success","data":[1,2,3]}"#)));
        let client = client_with(&file, &transport);

        let result = client.get("/api/test", None);
        assert_eq!(result.to_json(), json!({"status": "success", "data": [1, 2, 3]}));

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "https://api.test.com/api/test");
        assert_eq!(requests[0].header("authorization"), Some("Bearer test_token_12345"));
        assert!(requests[0].body.is_none());
    }

    #[test]
    fn get_passes_query_params() {
        let file = token_file("t");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        client.get("users", Some(&[("page", "2"), ("q", "a b")]));
        assert_eq!(
            transport.last_request().query,
            vec![("page".to_string(), "2".to_string()), ("q".to_string(), "a b".to_string())]
        );
    }

    #[test]
    fn get_error_is_structured() {
        let file = token_file("t");
        let transport = FakeTransport::replying(|| Ok(HttpResponse::new(404, r#"{"message":"Not found"}"#)));
        let client = client_with(&file, &transport);

        assert_eq!(
            client.get("/api/test", None).to_json(),
            json!({"error": "HTTP 404", "message": "Not found", "details": {"message": "Not found"}})
        );
    }

    #[test]
    fn get_plain_text_is_wrapped() {
        let file = token_file("t");
        let transport = FakeTransport::replying(|| Ok(HttpResponse::new(200, "Plain text response")));
        let client = client_with(&file, &transport);

        assert_eq!(client.get("/api/test", None).to_json(), json!({"content": "Plain text response"}));
    }

    #[test]
    fn post_json_serializes_body() {
        let file = token_file("t");
        let transport = FakeTransport::replying(|| Ok(HttpResponse::new(201, r#"{"id":123,"status":"created"}"#)));
        let client = client_with(&file, &transport);

        let payload = json!({"name": "Test User", "email": "test@example.com"});
        let result = client.post("/api/users", None, Some(&payload));
        assert_eq!(result.to_json(), json!({"id": 123, "status": "created"}));

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, payload);
    }

    #[test]
    fn post_connection_failure_becomes_request_failed() {
        let file = token_file("t");
        let transport = FakeTransport::replying(|| {
            Err(TransportError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused")))
        });
        let client = client_with(&file, &transport);

        let result = client.post("/api/users", None, Some(&json!({"a": 1})));
        assert_eq!(result, ApiResponse::RequestFailed("Connection refused".to_string()));
        assert_eq!(result.to_json(), json!({"error": "Request failed: Connection refused"}));
    }

    #[test]
    fn put_form_data_is_urlencoded() {
        let file = token_file("t");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        let form = RequestBody::form([("name", "Ada Lovelace"), ("lang", "en&fr")]);
        client.put("/api/users/1", Some(&form), None);

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.header("Content-Type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(request.body.as_deref(), Some("name=Ada+Lovelace&lang=en%26fr"));
        assert_eq!(request.headers.len(), 2);
    }

    #[test]
    fn raw_data_is_sent_verbatim_and_wins_over_json() {
        let file = token_file("t");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        let raw = RequestBody::raw("not json at all");
        client.post("/upload", Some(&raw), Some(&json!({"ignored": true})));

        let request = transport.last_request();
        assert_eq!(request.body.as_deref(), Some("not json at all"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn json_body_sets_content_type_without_token() {
        let file = token_file("");
        let transport = FakeTransport::replying(ok_empty);
        let client = client_with(&file, &transport);

        client.post("/api/users", None, Some(&json!({"a": 1})));
        let request = transport.last_request();
        assert_eq!(request.headers, vec![("Content-Type".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn delete_sends_no_body() {
        let file = token_file("t");
        let transport = FakeTransport::replying(|| Ok(HttpResponse::new(204, "")));
        let client = client_with(&file, &transport);

        assert_eq!(client.delete("/api/users/1"), ApiResponse::Content(String::new()));
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "https://api.test.com/api/users/1");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }
}
