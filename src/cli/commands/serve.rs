//! `kort serve` - start the HTTP API.

use crate::config::Settings;
use crate::server::run_server;

pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    run_server(&host, port, settings).await
}
