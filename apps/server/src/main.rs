use cryptorank_server::api::app_router;
use cryptorank_server::config::Config;
use cryptorank_server::{build_state, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config).await?;

    if config.schedule_enabled {
        scheduler::start_snapshot_scheduler(state.clone());
    } else {
        tracing::info!("Snapshot scheduler disabled; use POST /dev/trigger");
    }

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
