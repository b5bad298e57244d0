use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the log subscriber for the binary; library `log` records are captured too.
pub fn init(verbose: u8) -> Result<()> {
    // RUST_LOG wins; otherwise warnings only, more with each -v
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
