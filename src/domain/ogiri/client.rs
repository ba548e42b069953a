use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};

use crate::error::AppError;

/// 생성에 사용하는 모델
pub const COMPLETION_MODEL: &str = "gpt-4o";
/// 샘플링 온도
pub const COMPLETION_TEMPERATURE: f32 = 0.95;
/// ボケ 5개에 충분한 응답 토큰 상한
pub const COMPLETION_MAX_TOKENS: u16 = 400;

/// OpenAI 에러를 세분화된 AppError로 변환
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = &api_err.message;

            // 에러 코드가 JSON Value일 수 있으므로 문자열로 변환
            let err_code = api_err
                .code
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or("");

            if err_code == "invalid_api_key"
                || err_type == "authentication_error"
                || message.contains("API key")
            {
                AppError::CompletionAuthError
            } else if err_type == "rate_limit_error"
                || err_type == "insufficient_quota"
                || err_code == "rate_limit_exceeded"
                || err_code == "insufficient_quota"
                || message.contains("rate limit")
            {
                AppError::CompletionRateLimitError
            } else if err_type == "server_error" || err_code.contains("server") {
                AppError::CompletionTemporaryError
            } else {
                AppError::CompletionError(message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::CompletionTemporaryError
            } else if status == Some(401) {
                AppError::CompletionAuthError
            } else if status == Some(429) {
                AppError::CompletionRateLimitError
            } else if req_err
                .status()
                .map(|s| s.is_server_error())
                .unwrap_or(false)
            {
                AppError::CompletionTemporaryError
            } else {
                AppError::CompletionError(req_err.to_string())
            }
        }
        OpenAIError::JSONDeserialize(e) => AppError::CompletionMalformed(e.to_string()),
        _ => AppError::CompletionError(error.to_string()),
    }
}

/// 첫 번째 choice의 본문 추출
fn first_choice_text(response: CreateChatCompletionResponse) -> Result<String, AppError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::CompletionMalformed("no choices".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| AppError::CompletionMalformed("empty message content".to_string()))
}

/// 텍스트 완성 클라이언트 인터페이스
///
/// OpenAI 호출을 추상화하여 테스트에서 Mock 객체로 대체할 수 있습니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// 프롬프트를 단일 user 메시지로 보내고 첫 번째 choice의 텍스트 반환
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;

    /// API 키가 설정되어 있는지 (네트워크 호출 없음)
    fn is_configured(&self) -> bool;
}

/// Arc로 래핑된 클라이언트 (Clone 지원)
pub type SharedCompletionClient = Arc<dyn CompletionClient>;

/// OpenAI Chat Completions 구현체
#[derive(Clone)]
pub struct OpenAiClient {
    /// API 키가 없으면 None. 호출 시점에 MissingApiKey 반환
    client: Option<Client<OpenAIConfig>>,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: Option<&str>, api_base: Option<&str>, timeout: Duration) -> Self {
        let client = api_key.map(|key| {
            let mut config = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = api_base {
                config = config.with_api_base(base);
            }
            Client::with_config(config)
        });

        Self { client, timeout }
    }

    fn client(&self) -> Result<&Client<OpenAIConfig>, AppError> {
        self.client.as_ref().ok_or(AppError::MissingApiKey)
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let client = self.client()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(COMPLETION_MODEL)
            .messages(vec![build_user_message(prompt)?])
            .temperature(COMPLETION_TEMPERATURE)
            .max_tokens(COMPLETION_MAX_TOKENS)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::debug!(
            model = COMPLETION_MODEL,
            prompt_chars = prompt.chars().count(),
            "Calling chat completion"
        );

        let response = tokio::time::timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Chat completion timed out");
                AppError::CompletionTemporaryError
            })?
            .map_err(classify_openai_error)?;

        if let Some(usage) = &response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion finished"
            );
        }

        first_choice_text(response)
    }

    fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

pub(crate) fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    ))
}
