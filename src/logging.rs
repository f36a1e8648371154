use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the console subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "registrar_bot=debug"
    } else {
        "registrar_bot=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
