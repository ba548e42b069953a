//! 高評価ボケ few-shot 예제
//!
//! 평가가 붙은 과거 ボケ CSV를 기동 시 한 번 읽어 두고,
//! 요청마다 몇 개를 무작위로 뽑아 프롬프트에 넣습니다.

use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

/// 예제로 쓸 수 있는 최소 평가값
pub const MIN_RATING: f64 = 70.0;
/// 요청당 최대 예제 수
pub const SAMPLE_SIZE: usize = 3;

const TOPIC_COLUMN: &str = "お題";
const PUNCHLINE_COLUMN: &str = "ボケ";
const RATING_COLUMN: &str = "評価値";

/// 평가가 붙은 과거 ボケ 한 건
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleRecord {
    pub topic: String,
    pub punchline: String,
    pub rating: f64,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "お題")]
    topic: Option<String>,
    #[serde(rename = "ボケ")]
    punchline: Option<String>,
    #[serde(rename = "評価値")]
    rating: Option<String>,
}

impl RawRow {
    /// 빈 칸이 있거나 평가값이 유한한 숫자가 아니면 None
    fn into_record(self) -> Option<ExampleRecord> {
        let topic = non_blank(self.topic)?;
        let punchline = non_blank(self.punchline)?;
        let rating = non_blank(self.rating)?.parse::<f64>().ok()?;
        if !rating.is_finite() {
            return None;
        }
        Some(ExampleRecord {
            topic,
            punchline,
            rating,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("データファイルを開けません ({path}): {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("データファイルに必要な列がありません: {0}")]
    MissingColumn(&'static str),
    #[error("データファイルの形式が不正です: {0}")]
    Malformed(#[from] csv::Error),
}

/// 프로세스 수명 동안 유지되는 읽기 전용 예제 저장소
///
/// 기동 시 한 번 만들고 서비스에 주입합니다. 생성 후에는 변경되지 않습니다.
#[derive(Debug, Default)]
pub struct ExampleStore {
    records: Vec<ExampleRecord>,
    load_error: Option<String>,
}

impl ExampleStore {
    /// few-shot 비활성 (예제 없음, 에러 없음)
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ExampleRecord>) -> Self {
        Self {
            records: eligible(records),
            load_error: None,
        }
    }

    /// CSV 파일 로드
    ///
    /// 실패하면 에러를 기록하고 빈 저장소로 대체합니다. 생성은 예제 없이 진행됩니다.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(store) => {
                tracing::info!(
                    path = %path.display(),
                    eligible = store.records.len(),
                    "Loaded example dataset"
                );
                store
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load example dataset");
                Self {
                    records: Vec::new(),
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in [TOPIC_COLUMN, PUNCHLINE_COLUMN, RATING_COLUMN] {
            if !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == column) {
                return Err(DatasetError::MissingColumn(column));
            }
        }
        if headers.get(0).is_some_and(|h| h.starts_with('\u{feff}')) {
            // Excel 저장 CSV의 BOM 제거
            let cleaned: csv::StringRecord = headers
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}'))
                .collect();
            csv_reader.set_headers(cleaned);
        }

        let mut total = 0usize;
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<RawRow>() {
            total += 1;
            if let Some(record) = row?.into_record() {
                records.push(record);
            }
        }

        let records = eligible(records);
        tracing::debug!(total, eligible = records.len(), "Filtered example rows");
        Ok(Self {
            records,
            load_error: None,
        })
    }

    /// 평가값 기준을 통과한 예제
    pub fn eligible(&self) -> &[ExampleRecord] {
        &self.records
    }

    /// 로드 실패 메시지 (화면 표시용)
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// min(3, 예제 수)개를 중복 없이 균등하게 추출
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ExampleRecord> {
        self.records
            .choose_multiple(rng, SAMPLE_SIZE)
            .cloned()
            .collect()
    }
}

fn eligible(records: Vec<ExampleRecord>) -> Vec<ExampleRecord> {
    records
        .into_iter()
        .filter(|r| r.rating.is_finite() && r.rating >= MIN_RATING)
        .collect()
}
