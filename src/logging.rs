use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "massbind=debug,info" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed when running under tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
