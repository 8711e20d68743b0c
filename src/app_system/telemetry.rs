use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (from config) is used.
/// Calling this twice is harmless, the second call is ignored.
///
/// ```bash
/// RUST_LOG=debug storefront serve
/// RUST_LOG=storefront::clients=debug,info storefront serve
/// ```
pub fn setup_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .try_init();
}
