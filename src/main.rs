//! Probe harness binary entry point.

use probe_harness::config::HarnessConfig;
use probe_harness::process::SystemRunner;
use probe_harness::report::SvgBackend;
use probe_harness::{logging, Orchestrator};
use std::process::ExitCode;
use tracing::{error, info};

/// Runs the counter and pipeline suites with the default configuration.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = HarnessConfig::default();
    logging::init(&config.logging);

    if let Err(err) = config.validate() {
        error!(error = %err, "invalid configuration");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "probe harness starting");
    let orchestrator = Orchestrator::new(config, SystemRunner::new(), SvgBackend::default());
    match orchestrator.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "harness aborted");
            ExitCode::FAILURE
        },
    }
}
