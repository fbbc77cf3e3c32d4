mod config;

use std::sync::Arc;

use anyhow::Context;
use qload_core::{
    BuildContext, DispatchConfig, Dispatcher, EnvShutdownProbe, JobHandler, LineSource,
    RunnerRouter,
};
use qload_exec::register_compute_runner;
use qload_observe::logger_init;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::AgentConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let cfg = AgentConfig::from_env().context("invalid configuration")?;

    // 2) Logger
    logger_init(&cfg.logger).context("logger init")?;
    info!(
        max_concurrent_calls = cfg.max_concurrent_calls,
        cancel_mode = %cfg.compute.cancel_mode,
        progress_every = cfg.compute.progress_every,
        shutdown_file_var = %cfg.shutdown_file_var,
        "agent starting"
    );

    // 3) Router + runners
    let probe = Arc::new(EnvShutdownProbe::new(&cfg.shutdown_file_var));
    let mut router = RunnerRouter::new().with_context(BuildContext::with_probe(probe));
    register_compute_runner(&mut router, cfg.compute.clone());

    // 4) Dispatcher
    let dispatcher = Dispatcher::new(
        JobHandler::new(router),
        DispatchConfig {
            max_concurrent_calls: cfg.max_concurrent_calls,
        },
    );

    // 5) Shutdown on Ctrl+C
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                shutdown.cancel();
            }
        });
    }

    // 6) One message per stdin line
    info!("reading messages from stdin");
    let source = LineSource::new(BufReader::new(tokio::io::stdin()));
    let summary = dispatcher.run(source, shutdown).await;

    info!(
        received = summary.received,
        handled = summary.handled,
        abandoned = summary.abandoned,
        failed = summary.failed,
        "agent stopped"
    );
    Ok(())
}
