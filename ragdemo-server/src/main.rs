use clap::Parser;
use ragdemo_server::telemetry::init_tracing;
use ragdemo_server::{build_knowledge_base, Config, RagServer};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; flags and the real environment still apply.
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();
    init_tracing(config.log_format);
    if let Err(error) = &dotenv {
        if !error.not_found() {
            tracing::warn!(%error, "failed to read .env");
        }
    }

    config.validate()?;
    let addr = config.addr()?;
    let knowledge_base = build_knowledge_base(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    tracing::info!(
        port = config.port,
        text_path = %config.text_path.display(),
        pdf_path = %config.pdf_path.display(),
        "starting ragdemo server"
    );
    RagServer::new(addr, knowledge_base, shutdown_rx)
        .with_max_body_bytes(config.max_body_bytes)
        .serve()
        .await?;
    Ok(())
}
