use serde::Serialize;
use utoipa::ToSchema;

/// `/health` 응답
///
/// 외부 API를 호출하지 않고 프로세스 안에서 알 수 있는 상태만 담습니다.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    /// 생성 경로 준비 상태
    pub generation: GenerationReadiness,
    pub examples: ExampleSummary,
}

/// healthy: 생성 가능 / degraded: 키 누락 또는 데이터셋 로드 실패
#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReadiness {
    /// API 키 설정 여부
    #[schema(example = true)]
    pub api_key_configured: bool,
}

/// few-shot 데이터셋 요약
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSummary {
    /// 사용 가능한 예제 수
    #[schema(example = 42)]
    pub eligible: usize,
    /// 로드 실패 메시지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}
