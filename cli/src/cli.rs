use std::path::PathBuf;

use authclient_core::DEFAULT_TOKEN_FILE;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Bearer-token API client
///
/// Reads a bearer token from a file and sends authenticated requests to the
/// API at `--base-url` (or `API_BASE_URL`, also read from `.env`). Every
/// response is printed as JSON: the API's own body on success, or an object
/// with an `error` key on failure.
///
/// Run without a subcommand to check that the token and base URL are set up.
#[derive(Parser, Debug)]
#[command(name = "authclient", version, about, long_about)]
pub struct Args {
    /// File containing the bearer token.
    #[arg(long, short = 't', value_name = "PATH", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Base URL for API calls. Overrides API_BASE_URL.
    #[arg(long, short = 'u', value_name = "URL")]
    pub base_url: Option<String>,

    /// Log requests and responses to stderr.
    #[arg(long, short = 'd')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send a GET request.
    Get {
        endpoint: String,

        /// Query parameter, repeatable.
        #[arg(long = "query", short = 'q', value_name = "KEY=VALUE", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// Send a POST request.
    Post(BodyArgs),

    /// Send a PUT request.
    Put(BodyArgs),

    /// Send a DELETE request.
    Delete { endpoint: String },

    /// Create .env and token.txt from their .example files if missing.
    Init,
}

#[derive(ClapArgs, Debug, PartialEq, Eq)]
pub struct BodyArgs {
    pub endpoint: String,

    /// JSON request body.
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,

    /// Raw request body, sent as-is. Takes precedence over --json.
    #[arg(long, value_name = "TEXT", conflicts_with = "form")]
    pub data: Option<String>,

    /// Form field, repeatable. Takes precedence over --json.
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub form: Vec<(String, String)>,
}

/// Parse `key=value`. The value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
