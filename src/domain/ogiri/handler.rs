use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Json,
};
use axum_extra::extract::Form;
use validator::Validate;

use crate::error::AppError;
use crate::global::GateSurface;
use crate::response::{BaseResponse, ErrorResponse};
use crate::AppState;

use super::dto::{
    GenerateRequest, GenerateResult, GenerateSuccessResponse, OgiriForm, Rule, RuleOption,
};
use super::page::{render_form, render_gate, FormView};

/// 게이트 페이지
pub async fn index() -> Html<String> {
    Html(render_gate())
}

/// 폼 제출
///
/// 비밀번호 확인 → 폼 표시 → (생성 버튼 + お題 입력 시) ボケ 생성 순서로 처리합니다.
/// 에러는 입력값을 유지한 채 배너로 표시하고, 응답 상태 코드에 반영합니다.
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<OgiriForm>,
) -> (StatusCode, Html<String>) {
    if let Err(error) = state.gate.check(&form.password, GateSurface::Form) {
        return (error.status_code(), Html(render_gate()));
    }

    let selection = form.selection();
    let dataset_error = state.ogiri_service.examples().load_error();

    if !form.wants_generation() {
        let view = FormView {
            password: &form.password,
            topic: &form.topic,
            selection,
            dataset_error,
            ..Default::default()
        };
        return (StatusCode::OK, Html(render_form(&view)));
    }

    tracing::info!(
        topic_chars = form.topic.chars().count(),
        "Form generation requested"
    );

    match state.ogiri_service.generate(&form.topic, &selection).await {
        Ok(generation) => {
            let view = FormView {
                password: &form.password,
                topic: &form.topic,
                selection,
                punchlines: Some(generation.punchlines.as_slice()),
                dataset_error,
                ..Default::default()
            };
            (StatusCode::OK, Html(render_form(&view)))
        }
        Err(error) => {
            let status = error.status_code();
            tracing::error!(code = error.error_code(), error = %error, "Form generation failed");
            let view = FormView {
                password: &form.password,
                topic: &form.topic,
                selection,
                error: Some(&error),
                dataset_error,
                ..Default::default()
            };
            (status, Html(render_form(&view)))
        }
    }
}

/// ボケ 생성
///
/// お題와 선택한 규칙으로 프롬프트를 만들어 완성 API를 호출하고, 번호가 붙은 답만 골라 반환합니다.
#[utoipa::path(
    post,
    path = "/api/ogiri/generate",
    tag = "Ogiri",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "생성 성공", body = GenerateSuccessResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "비밀번호 불일치", body = ErrorResponse),
        (status = 429, description = "요청 한도 초과", body = ErrorResponse),
        (status = 500, description = "서버 설정 에러", body = ErrorResponse),
        (status = 502, description = "완성 API 응답 에러", body = ErrorResponse),
        (status = 503, description = "완성 API 일시 장애", body = ErrorResponse)
    )
)]
pub async fn generate_punchlines(
    State(state): State<AppState>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<GenerateResult>>, AppError> {
    // JSON 파싱 에러 처리
    let Json(request) = request.map_err(AppError::from)?;

    state.gate.check(&request.password, GateSurface::Api)?;

    request.validate()?;
    tracing::debug!("Request validation passed");

    let generation = state
        .ogiri_service
        .generate(&request.topic, &request.selection())
        .await?;

    tracing::info!(
        count = generation.punchlines.len(),
        examples = generation.examples.len(),
        "Punchlines generated successfully"
    );

    Ok(Json(BaseResponse::success(GenerateResult {
        topic: request.topic,
        punchlines: generation.punchlines,
        example_count: generation.examples.len(),
    })))
}

/// 규칙 카탈로그 조회
#[utoipa::path(
    get,
    path = "/api/ogiri/rules",
    tag = "Ogiri",
    responses(
        (status = 200, description = "조회 성공", body = [RuleOption])
    )
)]
pub async fn list_rules() -> Json<BaseResponse<Vec<RuleOption>>> {
    Json(BaseResponse::success(
        Rule::ALL.into_iter().map(RuleOption::from).collect(),
    ))
}
