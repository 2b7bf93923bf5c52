use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr subscriber. `RUST_LOG` takes precedence; otherwise only
/// warnings are shown, or debug output for the client crates with `--debug`.
pub fn init(debug: bool) {
    let default_directive = if debug {
        "authclient_core=debug,authclient=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
