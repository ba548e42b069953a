//! 로깅 초기화 모듈
//!
//! JSON 형식의 구조화된 로그를 stdout으로 출력합니다.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 기본 로그 필터
pub const DEFAULT_LOG_FILTER: &str = "info,ogiri_server=debug,tower_http=info";

/// 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG` 환경 변수로 로그 레벨을 설정할 수 있으며,
/// 기본값은 [`DEFAULT_LOG_FILTER`]입니다.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .flatten_event(false);

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
    {
        // 이미 초기화된 경우에도 서버는 계속 기동
        eprintln!("Failed to initialize tracing: {}", err);
    }
}
