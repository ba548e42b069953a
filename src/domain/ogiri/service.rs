use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::client::SharedCompletionClient;
use super::dto::RuleSelection;
use super::examples::{ExampleRecord, ExampleStore};
use super::parser::parse_punchlines;
use super::prompt::build_prompt;
use super::retry::with_retry;
use crate::error::AppError;

/// 한 번의 생성 결과
#[derive(Debug, Clone)]
pub struct Generation {
    pub punchlines: Vec<String>,
    pub examples: Vec<ExampleRecord>,
}

/// ボケ 생성 서비스
///
/// 예제 추출 → 프롬프트 조립 → 완성 API 호출 → 응답 파싱을 한 요청 안에서 순서대로 수행합니다.
pub struct OgiriService {
    client: SharedCompletionClient,
    examples: Arc<ExampleStore>,
    rng: Mutex<StdRng>,
}

impl OgiriService {
    pub fn new(client: SharedCompletionClient, examples: Arc<ExampleStore>) -> Self {
        Self::with_rng(client, examples, StdRng::from_entropy())
    }

    /// 난수원을 주입 (테스트에서 고정 시드 사용)
    pub fn with_rng(
        client: SharedCompletionClient,
        examples: Arc<ExampleStore>,
        rng: StdRng,
    ) -> Self {
        Self {
            client,
            examples,
            rng: Mutex::new(rng),
        }
    }

    pub fn examples(&self) -> &ExampleStore {
        &self.examples
    }

    pub fn client(&self) -> &SharedCompletionClient {
        &self.client
    }

    pub async fn generate(
        &self,
        topic: &str,
        selection: &RuleSelection,
    ) -> Result<Generation, AppError> {
        let examples = self.sample_examples();
        let prompt = build_prompt(topic, selection, &examples);

        tracing::info!(
            rules = selection.rules().len(),
            has_custom_rule = selection.custom_rule().is_some(),
            examples = examples.len(),
            "Generating punchlines"
        );

        let prompt = prompt.as_str();
        let text = with_retry(|| self.client.complete(prompt)).await?;

        let punchlines = parse_punchlines(&text);
        if punchlines.is_empty() {
            tracing::warn!(
                response_chars = text.chars().count(),
                "Completion contained no numbered answers"
            );
        } else {
            tracing::info!(count = punchlines.len(), "Punchlines parsed");
        }

        Ok(Generation {
            punchlines,
            examples,
        })
    }

    /// 요청마다 새로 추출. 락은 await 전에 해제됩니다.
    fn sample_examples(&self) -> Vec<ExampleRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.examples.sample(&mut *rng)
    }
}
