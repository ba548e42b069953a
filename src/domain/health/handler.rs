use axum::{extract::State, Json};

use super::dto::HealthStatus;
use crate::AppState;

/// 헬스체크 API
///
/// 버전, 가동 시간, API 키 설정 여부, 데이터셋 요약을 반환합니다. 완성 API는 호출하지 않습니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "헬스체크 성공", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.check(&state.ogiri_service))
}
