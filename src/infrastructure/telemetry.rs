use tracing_subscriber::filter::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` overrides `default_filter`.
pub fn setup_tracing(default_filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed_to_install_tracing_subscriber: {}", e))
}
