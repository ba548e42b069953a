use std::process::ExitCode;

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use ogiri_server::config::AppConfig;
use ogiri_server::logging::init_logging;
use ogiri_server::shutdown::shutdown_signal;
use ogiri_server::{create_router, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    init_logging();

    // 3. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // 4. 메트릭 레코더 설치
    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            return ExitCode::FAILURE;
        }
    };

    // 5. 상태 + 라우터 구성
    let state = AppState::from_config(&config);
    let app = create_router(state).route(
        "/metrics",
        get(move || std::future::ready(metrics_handle.render())),
    );

    // 6. 서버 실행
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %addr,
        few_shot = config.few_shot_enabled,
        "Server listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}
