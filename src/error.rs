use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::ValidationErrors;

use crate::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 접근 비밀번호 불일치
    #[error("パスワードが必要です。")]
    InvalidPassword,

    /// 요청 필드 검증 실패
    #[error("{0}")]
    ValidationError(String),

    /// JSON 본문 파싱 실패
    #[error("リクエスト形式が正しくありません: {0}")]
    JsonParseFailed(String),

    /// OpenAI API 키 미설정
    #[error("OPENAI_API_KEY が設定されていません")]
    MissingApiKey,

    /// OpenAI 인증 실패 (잘못된 API 키)
    #[error("OpenAI の認証に失敗しました")]
    CompletionAuthError,

    /// OpenAI 요청 한도 / 쿼터 초과
    #[error("OpenAI のリクエスト上限に達しました")]
    CompletionRateLimitError,

    /// 일시적 오류 (타임아웃, 네트워크, 5xx)
    #[error("OpenAI が一時的に利用できません")]
    CompletionTemporaryError,

    /// 응답에 choice 또는 본문이 없음
    #[error("OpenAI の応答が不正です: {0}")]
    CompletionMalformed(String),

    /// 그 외 OpenAI 에러
    #[error("OpenAI API エラー: {0}")]
    CompletionError(String),

    #[error("内部エラー: {0}")]
    Internal(String),
}

impl AppError {
    /// 에러 코드 반환
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidPassword => "AI_001",
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => "COMMON400",
            AppError::MissingApiKey => "AI_002",
            AppError::CompletionAuthError => "AI_003",
            AppError::CompletionRateLimitError => "AI_004",
            AppError::CompletionTemporaryError => "AI_005",
            AppError::CompletionMalformed(_) => "AI_006",
            AppError::CompletionError(_) => "AI_007",
            AppError::Internal(_) => "COMMON500",
        }
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey | AppError::CompletionAuthError | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::CompletionRateLimitError => StatusCode::TOO_MANY_REQUESTS,
            AppError::CompletionTemporaryError => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CompletionMalformed(_) | AppError::CompletionError(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// 사용자에게 노출할 메시지
    ///
    /// 내부 에러는 상세 내용을 숨깁니다.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(_) => "サーバーエラーが発生しました。管理者にお問い合わせください。".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse::new(self.error_code(), self.user_message());
        (status, Json(body)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}
