pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod logging;
pub mod response;
pub mod shutdown;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::AppConfig;
use domain::health::HealthService;
use domain::ogiri::{OgiriService, OpenAiClient};
use global::{request_tracing, AccessGate};

pub use domain::ogiri::{CompletionClient, ExampleRecord, ExampleStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::ogiri::handler::generate_punchlines,
        domain::ogiri::handler::list_rules,
        domain::health::handler::health_check,
    ),
    components(
        schemas(
            domain::ogiri::dto::GenerateRequest,
            domain::ogiri::dto::GenerateResult,
            domain::ogiri::dto::GenerateSuccessResponse,
            domain::ogiri::dto::Rule,
            domain::ogiri::dto::RuleOption,
            domain::health::dto::HealthStatus,
            domain::health::dto::HealthState,
            domain::health::dto::GenerationReadiness,
            domain::health::dto::ExampleSummary,
            response::ErrorResponse,
        )
    ),
    tags(
        (name = "Ogiri", description = "大喜利 ボケ 생성 API"),
        (name = "Health", description = "헬스체크 API")
    )
)]
pub struct ApiDoc;

/// 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    pub ogiri_service: Arc<OgiriService>,
    pub gate: AccessGate,
    pub health: Arc<HealthService>,
}

impl AppState {
    pub fn new(gate: AccessGate, ogiri_service: OgiriService) -> Self {
        Self {
            ogiri_service: Arc::new(ogiri_service),
            gate,
            health: Arc::new(HealthService::new()),
        }
    }

    /// 설정으로부터 상태 구성
    ///
    /// few-shot이 꺼져 있으면 데이터셋을 읽지 않습니다.
    pub fn from_config(config: &AppConfig) -> Self {
        let examples = if config.few_shot_enabled {
            ExampleStore::load(&config.dataset_path)
        } else {
            ExampleStore::disabled()
        };

        let client = OpenAiClient::new(
            config.openai_api_key.as_deref(),
            config.openai_api_base.as_deref(),
            config.completion_timeout,
        );

        Self::new(
            AccessGate::new(config.app_password.clone()),
            OgiriService::new(Arc::new(client), Arc::new(examples)),
        )
    }
}

/// 라우터 생성
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/",
            get(domain::ogiri::handler::index).post(domain::ogiri::handler::submit),
        )
        .route(
            "/api/ogiri/generate",
            post(domain::ogiri::handler::generate_punchlines),
        )
        .route("/api/ogiri/rules", get(domain::ogiri::handler::list_rules))
        .route("/health", get(domain::health::health_check))
        .layer(middleware::from_fn(request_tracing))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 테스트용 라우터 (Mock 클라이언트 주입, few-shot 비활성)
pub fn create_test_router_with_mock<C>(password: &str, client: C) -> Router
where
    C: CompletionClient + 'static,
{
    create_test_router_with_examples(password, client, ExampleStore::disabled(), 0)
}

/// 테스트용 라우터 (예제 저장소와 난수 시드 주입)
pub fn create_test_router_with_examples<C>(
    password: &str,
    client: C,
    examples: ExampleStore,
    seed: u64,
) -> Router
where
    C: CompletionClient + 'static,
{
    let service = OgiriService::with_rng(
        Arc::new(client),
        Arc::new(examples),
        StdRng::seed_from_u64(seed),
    );
    create_router(AppState::new(AccessGate::new(password), service))
}
