use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use authclient_core::{ApiResponse, AuthenticatedClient, RequestBody, Transport};
use serde_json::Value;
use tracing::info;

use crate::cli::{BodyArgs, Command};

/// Config files created by `init`, paired with the example they are copied from.
const CONFIG_FILES: [(&str, &str); 2] = [(".env", ".env.example"), ("token.txt", "token.txt.example")];

const TOKEN_PREVIEW_CHARS: usize = 10;

/// Copy each missing config file from its example. Returns the files created.
pub fn init(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for (target, example) in CONFIG_FILES {
        let target = dir.join(target);
        let example = dir.join(example);
        if target.exists() || !example.exists() {
            continue;
        }
        fs::copy(&example, &target)
            .with_context(|| format!("failed to copy {} to {}", example.display(), target.display()))?;
        info!(file = %target.display(), "created config file");
        created.push(target);
    }
    Ok(created)
}

/// Startup summary printed when no subcommand is given.
pub fn ready_report<T: Transport>(client: &AuthenticatedClient<T>) -> String {
    let preview: String = client
        .token()
        .unwrap_or_default()
        .chars()
        .take(TOKEN_PREVIEW_CHARS)
        .collect();
    let base_url = match client.base_url() {
        "" => "Not set",
        url => url,
    };
    format!(
        "Token loaded successfully (first {TOKEN_PREVIEW_CHARS} chars): {preview}...\n\
         Base URL: {base_url}\n\
         \n\
         API client is ready to use!"
    )
}

/// Issue the request a verb subcommand describes.
pub fn request<T: Transport>(client: &AuthenticatedClient<T>, command: &Command) -> Result<ApiResponse> {
    let response = match command {
        Command::Get { endpoint, query } => {
            let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            client.get(endpoint, Some(params.as_slice()))
        }
        Command::Post(body) => {
            let (data, json) = body_parts(body)?;
            client.post(&body.endpoint, data.as_ref(), json.as_ref())
        }
        Command::Put(body) => {
            let (data, json) = body_parts(body)?;
            client.put(&body.endpoint, data.as_ref(), json.as_ref())
        }
        Command::Delete { endpoint } => client.delete(endpoint),
        Command::Init => anyhow::bail!("init does not issue a request"),
    };
    Ok(response)
}

/// Run a non-`init` invocation against `client`, writing results to `out`
/// and diagnostics to `err`. Returns whether the run succeeded.
///
/// Without a loaded token nothing is sent.
pub fn execute<T, O, E>(
    client: &AuthenticatedClient<T>,
    command: Option<&Command>,
    out: &mut O,
    err: &mut E,
) -> Result<bool>
where
    T: Transport,
    O: Write,
    E: Write,
{
    if let Some(diagnostic) = client.token_diagnostic() {
        writeln!(err, "Warning: {diagnostic}.")?;
        writeln!(err, "Please create {} with your bearer token.", diagnostic.path().display())?;
        writeln!(err, "No valid token found. Please check your token file.")?;
        return Ok(false);
    }

    let Some(command) = command else {
        writeln!(out, "{}", ready_report(client))?;
        return Ok(true);
    };

    let response = request(client, command)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    Ok(response.is_success())
}

fn body_parts(args: &BodyArgs) -> Result<(Option<RequestBody>, Option<Value>)> {
    let json = args
        .json
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--json is not valid JSON")?;

    let data = match (&args.data, args.form.is_empty()) {
        (Some(raw), _) => Some(RequestBody::raw(raw.clone())),
        (None, false) => Some(RequestBody::Form(args.form.clone())),
        (None, true) => None,
    };
    Ok((data, json))
}
