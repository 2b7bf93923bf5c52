//! `authclient` - send bearer-authenticated requests from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Check that token.txt and API_BASE_URL are set up
//! authclient
//!
//! # GET with query parameters
//! authclient get /api/users -q name=Ada
//!
//! # POST a JSON body
//! authclient --base-url https://api.example.com post /api/users --json '{"name":"Ada"}'
//!
//! # Create .env and token.txt from the shipped examples
//! authclient init
//! ```

mod cli;
mod commands;
mod logging;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use authclient_core::{AuthenticatedClient, ClientConfig, API_BASE_URL_ENV};
use clap::Parser;

use cli::{Args, Command};

fn main() -> ExitCode {
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init(args.debug);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.command == Some(Command::Init) {
        let created = commands::init(Path::new("."))?;
        if created.is_empty() {
            println!("Nothing to create; config files already exist or have no example.");
        }
        for file in created {
            println!("Created {}", file.display());
        }
        println!("Edit token.txt with your bearer token and .env with your API base URL.");
        return Ok(ExitCode::SUCCESS);
    }

    let env_base_url = std::env::var(API_BASE_URL_ENV).ok();
    let config = ClientConfig::resolve(&args.token_file, args.base_url.as_deref(), env_base_url.as_deref());
    let client = AuthenticatedClient::new(config);

    let succeeded = commands::execute(
        &client,
        args.command.as_ref(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
