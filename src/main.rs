// src/main.rs

use axum::{routing::post, serve, Router};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use rust_adx_rx::adapters::rx::RxAdapter;
use rust_adx_rx::api::handlers::handle_openrtb_request;
use rust_adx_rx::bidding::dsp_client::DspClient;
use rust_adx_rx::config::{CliArgs, ConfigManager};
use rust_adx_rx::logging::logger::init_tracing;
use rust_adx_rx::{mock_dsp, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志，guard 需要活到进程结束
    let _guard = init_tracing(&args.log_dir)?;

    let config = ConfigManager::from_args(&args);
    info!(
        rx_endpoint = %config.rx_endpoint,
        timeout_ms = config.timeout_ms,
        "adapter server starting on port {}",
        args.port
    );

    // 启动 Mock RX 服务
    if args.mock_port != 0 {
        let mock_port = args.mock_port;
        tokio::spawn(async move {
            if let Err(e) = mock_dsp::start_mock_dsp_server(mock_port).await {
                error!(error = %e, "mock rx server stopped");
            }
        });
    }

    let state = Arc::new(AppState {
        bidder: Arc::new(RxAdapter::new(&config.rx_endpoint)),
        dsp_client: DspClient::new(config.timeout_ms),
    });

    let app = Router::new()
        .route("/openrtb", post(handle_openrtb_request))
        .with_state(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("adapter server running at http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "failed to listen for ctrl-c");
            }
            info!("Shutting down gracefully...");
        })
        .await?;

    info!("adapter server shut down.");
    Ok(())
}
