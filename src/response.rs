use serde::Serialize;
use utoipa::ToSchema;

/// API 공통 응답 형식
///
/// ```json
/// {
///   "isSuccess": true,
///   "code": "COMMON200",
///   "message": "成功しました。",
///   "result": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: "成功しました。".to_string(),
            result: Some(result),
        }
    }
}

/// 에러 응답 형식
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// 성공 여부 (에러 시 항상 false)
    #[schema(example = false)]
    pub is_success: bool,

    /// 에러 코드
    #[schema(example = "AI_001")]
    pub code: String,

    /// 에러 메시지
    #[schema(example = "パスワードが必要です。")]
    pub message: String,

    /// 항상 null
    pub result: Option<()>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }
}
