use anyhow::Context;
use std::sync::Arc;
use tasksync_merge::PatchMerger;
use tasksync_model::Timestamp;
use tasksync_server::{command, telemetry, ServerConfig};
use tasksync_store::{FileBackend, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = ServerConfig::from_matches(&matches)?;

    telemetry::init(config.log_format).context("failed to install tracing subscriber")?;
    tracing::info!(
        version = tasksync_server::VERSION,
        data = %config.data.display(),
        policy = %config.merge_policy,
        "starting tasksync server"
    );

    let fixtures = config.fixtures();
    let store = Store::open(
        Arc::new(FileBackend::new(&config.data)),
        PatchMerger::from_kind(config.merge_policy),
        move || fixtures.generate(Timestamp::now()),
    )
    .await
    .with_context(|| format!("failed to open store at {}", config.data.display()))?;

    let (_, server) = tasksync_server::bind(
        Arc::new(store),
        config.bind,
        config.body_limit,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c, running until killed");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown requested");
        },
    )?;

    server.await;
    tracing::info!("server stopped");
    Ok(())
}
