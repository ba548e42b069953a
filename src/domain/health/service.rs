use std::time::Instant;

use super::dto::{ExampleSummary, GenerationReadiness, HealthState, HealthStatus};
use crate::domain::ogiri::OgiriService;

/// 기동 시각을 기억하고 현재 준비 상태를 요약합니다.
///
/// 비밀번호 게이트 밖의 경로이므로 완성 API는 호출하지 않습니다.
pub struct HealthService {
    started_at: Instant,
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn check(&self, ogiri: &OgiriService) -> HealthStatus {
        let api_key_configured = ogiri.client().is_configured();
        let load_error = ogiri.examples().load_error().map(str::to_string);

        let status = if api_key_configured && load_error.is_none() {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        };
        tracing::debug!(?status, api_key_configured, "Health summarized");

        HealthStatus {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: self.uptime_secs(),
            generation: GenerationReadiness { api_key_configured },
            examples: ExampleSummary {
                eligible: ogiri.examples().eligible().len(),
                load_error,
            },
        }
    }
}
