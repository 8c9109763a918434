//! CLI command implementations
//!
//! Server commands build their own tokio runtime and block until a
//! shutdown signal. `probe` is a thin WebSocket client.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::info;

use crate::bridge::{BridgeState, ClientEvent, Frame, HttpResourceApi};
use crate::http_server::{ApiServer, BridgeServer};
use crate::observability::{init_tracing, Event, MetricsRegistry};
use crate::rest_api::ApiState;

use super::args::Command;
use super::config::AppConfig;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Api { config } => api(&config),
        Command::Bridge { config } => bridge(&config),
        Command::Serve { config } => serve(&config),
        Command::Probe {
            url,
            event,
            id,
            timeout_secs,
        } => probe(&url, &event, id, Duration::from_secs(timeout_secs)),
        Command::Config { config } => print_config(&config),
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))
}

fn load(config_path: &Path) -> CliResult<AppConfig> {
    init_tracing();
    let config = AppConfig::load(config_path)?;
    info!(
        event = %Event::ConfigLoaded,
        path = %config_path.display(),
        api_port = config.server.api_port,
        bridge_port = config.server.bridge_port,
        "configuration loaded"
    );
    Ok(config)
}

fn api_server(config: &AppConfig, metrics: Arc<MetricsRegistry>) -> ApiServer {
    ApiServer::new(
        config.server.clone(),
        Arc::new(ApiState::in_memory()),
        metrics,
    )
}

fn bridge_server(config: &AppConfig, metrics: Arc<MetricsRegistry>) -> CliResult<BridgeServer> {
    let api = HttpResourceApi::new(config.bridge.api_base_url.clone())?;
    let state = BridgeState::new(&config.bridge, Arc::new(api), metrics);
    Ok(BridgeServer::new(config.server.clone(), Arc::new(state)))
}

/// Both servers over one registry, so the bridge's `/metrics` also
/// reports what the API counts
fn combined_servers(config: &AppConfig) -> CliResult<(ApiServer, BridgeServer)> {
    let metrics = Arc::new(MetricsRegistry::new());
    let api = api_server(config, Arc::clone(&metrics));
    let bridge = bridge_server(config, metrics)?;
    Ok((api, bridge))
}

/// Serve the resource API
pub fn api(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let server = api_server(&config, Arc::new(MetricsRegistry::new()));

    runtime()?.block_on(async {
        server
            .run()
            .await
            .map_err(|e| CliError::serve_failed(format!("Resource API failed: {}", e)))
    })
}

/// Serve the aggregation bridge
pub fn bridge(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let server = bridge_server(&config, Arc::new(MetricsRegistry::new()))?;

    runtime()?.block_on(async {
        server
            .run()
            .await
            .map_err(|e| CliError::serve_failed(format!("Bridge failed: {}", e)))
    })
}

/// Serve both in one process. The API is bound before the bridge starts
/// accepting so the bridge never races its upstream.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let (api, bridge) = combined_servers(&config)?;

    runtime()?.block_on(async {
        let api_listener = TcpListener::bind(config.server.api_addr()).await?;
        let bridge_listener = TcpListener::bind(config.server.bridge_addr()).await?;

        tokio::try_join!(api.serve(api_listener), bridge.serve(bridge_listener))
            .map_err(|e| CliError::serve_failed(e.to_string()))?;
        Ok::<(), CliError>(())
    })
}

/// Send one request to a bridge and print the first reply
pub fn probe(url: &str, event: &str, id: Option<u64>, timeout: Duration) -> CliResult<()> {
    let request = build_request(event, id)?;

    let frame = runtime()?
        .block_on(async { tokio::time::timeout(timeout, exchange(url, request)).await })
        .map_err(|_| CliError::probe_failed(format!("no reply within {:?}", timeout)))??;

    println!("{}", serde_json::to_string_pretty(&frame)?);
    Ok(())
}

fn build_request(event: &str, id: Option<u64>) -> CliResult<ClientEvent> {
    let require_id = || {
        id.ok_or_else(|| CliError::probe_failed(format!("{} requires --id", event)))
    };

    match event {
        "getBreweries" => Ok(ClientEvent::GetBreweries),
        "getBreweryById" => Ok(ClientEvent::GetBreweryById(require_id()?)),
        "deleteBrewery" => Ok(ClientEvent::DeleteBrewery(require_id()?)),
        other => Err(CliError::probe_failed(format!("unknown event: {}", other))),
    }
}

async fn exchange(url: &str, request: ClientEvent) -> CliResult<Frame> {
    let (mut socket, _) = connect_async(url)
        .await
        .map_err(|e| CliError::probe_failed(format!("connect {}: {}", url, e)))?;

    let text = serde_json::to_string(&request.to_frame())?;
    socket
        .send(Message::Text(text))
        .await
        .map_err(|e| CliError::probe_failed(e.to_string()))?;

    while let Some(message) = socket.next().await {
        match message.map_err(|e| CliError::probe_failed(e.to_string()))? {
            Message::Text(text) => {
                let frame: Frame = serde_json::from_str(&text)?;
                let _ = socket.close(None).await;
                return Ok(frame);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    Err(CliError::probe_failed("connection closed before a reply"))
}

/// Print the effective configuration
pub fn print_config(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_build_request() {
        assert_eq!(
            build_request("getBreweries", None).unwrap(),
            ClientEvent::GetBreweries
        );
        assert_eq!(
            build_request("deleteBrewery", Some(3)).unwrap(),
            ClientEvent::DeleteBrewery(3)
        );
        assert!(build_request("getBreweryById", None).is_err());
        assert!(build_request("createBrewery", Some(1)).is_err());
    }

    #[tokio::test]
    async fn test_combined_servers_share_metrics() {
        let (api, bridge) = combined_servers(&AppConfig::default()).unwrap();

        let rejected = api
            .router()
            .oneshot(
                Request::builder()
                    .uri("/breweries")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::FORBIDDEN);

        let response = bridge
            .router()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["origin_rejections"], 1);
    }
}
