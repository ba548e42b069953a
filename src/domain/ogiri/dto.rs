use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// ボケのルール カタログ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    /// センス良くする
    Stylish,
    /// 短めの回答
    Short,
    /// テンポと落ちを重視する
    Tempo,
    /// 意外性を取り入れる
    Surprise,
    /// シュールにする
    Surreal,
    /// 毒舌ブラックにする
    Dark,
    /// かわいさを加える
    Cute,
    /// ツッコミ風の一文にする
    Tsukkomi,
}

impl Rule {
    /// 카탈로그 순서
    pub const ALL: [Rule; 8] = [
        Rule::Stylish,
        Rule::Short,
        Rule::Tempo,
        Rule::Surprise,
        Rule::Surreal,
        Rule::Dark,
        Rule::Cute,
        Rule::Tsukkomi,
    ];

    /// 프롬프트에 들어가는 규칙 문구
    pub fn phrase(&self) -> &'static str {
        match self {
            Rule::Stylish => "センス良くする",
            Rule::Short => "短めの回答",
            Rule::Tempo => "テンポと落ちを重視する",
            Rule::Surprise => "意外性を取り入れる",
            Rule::Surreal => "シュールにする",
            Rule::Dark => "毒舌ブラックにする",
            Rule::Cute => "かわいさを加える",
            Rule::Tsukkomi => "ツッコミ風の一文にする",
        }
    }

    /// 폼 값 / JSON 값으로 쓰는 식별자
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Stylish => "STYLISH",
            Rule::Short => "SHORT",
            Rule::Tempo => "TEMPO",
            Rule::Surprise => "SURPRISE",
            Rule::Surreal => "SURREAL",
            Rule::Dark => "DARK",
            Rule::Cute => "CUTE",
            Rule::Tsukkomi => "TSUKKOMI",
        }
    }
}

/// 선택된 규칙 + 자유 입력 규칙
///
/// 같은 규칙이 여러 번 선택되면 처음 한 번만 남깁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSelection {
    rules: Vec<Rule>,
    custom_rule: String,
}

impl RuleSelection {
    pub fn new(rules: impl IntoIterator<Item = Rule>, custom_rule: impl Into<String>) -> Self {
        let mut selected = Vec::new();
        for rule in rules {
            if !selected.contains(&rule) {
                selected.push(rule);
            }
        }
        Self {
            rules: selected,
            custom_rule: custom_rule.into(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 앞뒤 공백 제거 후 비어 있지 않은 자유 규칙
    pub fn custom_rule(&self) -> Option<&str> {
        let trimmed = self.custom_rule.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn raw_custom_rule(&self) -> &str {
        &self.custom_rule
    }
}

/// ボケ生成 요청 DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// 접근 비밀번호
    #[schema(example = "defaultpass")]
    pub password: String,

    /// お題 (빈 문자열만 거부, 공백만 있는 값은 허용)
    #[validate(length(min = 1, message = "お題を入力してください"))]
    #[schema(example = "こんな運動会は嫌だ")]
    pub topic: String,

    /// 선택한 규칙 (선택 순서 유지)
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// 자유 입력 규칙
    #[serde(default)]
    #[schema(example = "関西弁で")]
    pub custom_rule: String,
}

impl GenerateRequest {
    pub fn selection(&self) -> RuleSelection {
        RuleSelection::new(self.rules.iter().copied(), self.custom_rule.clone())
    }
}

/// ボケ生成 결과
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    #[schema(example = "こんな運動会は嫌だ")]
    pub topic: String,

    /// 파싱된 ボケ 목록 (0개 이상)
    pub punchlines: Vec<String>,

    /// 프롬프트에 주입된 예제 수
    #[schema(example = 3)]
    pub example_count: usize,
}

/// ボケ生成 성공 응답 (OpenAPI 스키마용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    #[schema(example = "成功しました。")]
    pub message: String,
    pub result: GenerateResult,
}

/// 규칙 카탈로그 항목
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleOption {
    #[schema(example = "SHORT")]
    pub code: &'static str,
    #[schema(example = "短めの回答")]
    pub phrase: &'static str,
}

impl From<Rule> for RuleOption {
    fn from(rule: Rule) -> Self {
        Self {
            code: rule.code(),
            phrase: rule.phrase(),
        }
    }
}

/// HTML 폼 입력
///
/// 체크박스는 `rules=SHORT&rules=DARK`처럼 반복 키로 전송됩니다.
#[derive(Debug, Default, Deserialize)]
pub struct OgiriForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub custom_rule: String,
    /// 생성 버튼이 눌렸을 때만 존재
    #[serde(default)]
    pub generate: Option<String>,
}

impl OgiriForm {
    /// 생성 조건: 버튼이 눌렸고 お題가 빈 문자열이 아님
    pub fn wants_generation(&self) -> bool {
        self.generate.is_some() && !self.topic.is_empty()
    }

    pub fn selection(&self) -> RuleSelection {
        RuleSelection::new(self.rules.iter().copied(), self.custom_rule.clone())
    }
}
