use std::sync::Arc;

use qr_relay::detect::QrScanner;
use qr_relay::{QrServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let mut config = ServerConfig::from_env();
    if config.ready_file.is_none() {
        config = config.with_ready_file("server_ready");
    }
    log::info!("starting qr relay server on {}", config.addr());

    let server = Arc::new(QrServer::new(config, Box::new(QrScanner)));

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("shutdown requested");
            signal_server.stop().await;
        }
    });

    server.start().await?;
    Ok(())
}
