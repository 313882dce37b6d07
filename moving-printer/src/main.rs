//! Moving printer client
//!
//! Connects to the moving server's label-event stream, fetches each
//! announced label PDF and submits it to the local print spooler.
//! Runs as a daemon next to the physical printer; reconnects with a
//! fixed delay whenever the stream drops.

mod client;
mod config;
mod error;
mod spool;

use std::time::Duration;

use futures::StreamExt;
use tracing::{error, info, warn};

use crate::client::{LineBuffer, ServerClient};
use crate::config::PrinterConfig;
use crate::error::{PrinterError, PrinterResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = PrinterConfig::from_env()?;
    let client = ServerClient::new(&config)?;

    info!(
        server = %config.server_url,
        printer = %config.printer_name,
        "printer client starting"
    );

    loop {
        match run_stream(&config, &client).await {
            // Stream ended cleanly (server shutdown); reconnect.
            Ok(()) => info!("event stream closed, reconnecting"),
            Err(PrinterError::Unauthorized) => {
                anyhow::bail!("server rejected credentials, check MOVING_USERNAME/MOVING_PASSWORD");
            }
            Err(PrinterError::StreamBusy) => {
                warn!("another printer client holds the event stream, retrying");
            }
            Err(e) => error!(error = %e, "event stream failed"),
        }
        tokio::time::sleep(Duration::from_secs(config.retry_secs)).await;
    }
}

/// Consume one stream connection until it ends or fails.
async fn run_stream(config: &PrinterConfig, client: &ServerClient) -> PrinterResult<()> {
    let response = client.subscribe_events().await?;
    info!("subscribed to label events");

    let mut body = response.bytes_stream();
    let mut lines = LineBuffer::new();

    while let Some(chunk) = body.next().await {
        for id in lines.push(&chunk?) {
            if let Err(e) = handle_label(config, client, id).await {
                // One bad label must not take the daemon down.
                error!(label_id = id, error = %e, "failed to print label");
            }
        }
    }
    Ok(())
}

async fn handle_label(
    config: &PrinterConfig,
    client: &ServerClient,
    id: i64,
) -> PrinterResult<()> {
    let Some(pdf) = client.fetch_label(id).await? else {
        warn!(label_id = id, "no stored document for announced label, skipping");
        return Ok(());
    };

    info!(label_id = id, bytes = pdf.len(), "printing label");
    spool::print_pdf(&config.lp_path, &config.printer_name, &pdf).await
}
