//! Tracing setup. Logs go to stderr: stdout belongs to the event bridge and
//! to CLI output.

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "clockbot=info";

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "clockbot=debug"
        } else {
            DEFAULT_FILTER
        })
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
