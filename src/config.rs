use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 비밀번호 미설정 시 사용되는 기본값
pub const DEFAULT_APP_PASSWORD: &str = "defaultpass";
/// 기본 시크릿 파일 경로
pub const DEFAULT_SECRETS_PATH: &str = ".secrets.toml";
/// 기본 예제 데이터셋 경로
pub const DEFAULT_DATASET_PATH: &str = "ogiri_dataset.csv";
/// OpenAI 호출 기본 타임아웃 (초)
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,

    /// 접근 비밀번호 (secrets → env → 기본값)
    pub app_password: String,

    /// OpenAI API 키 (secrets → env). 없으면 호출 시점에 에러
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub completion_timeout: Duration,

    /// few-shot 예제 주입 여부
    pub few_shot_enabled: bool,
    pub dataset_path: PathBuf,
}

impl AppConfig {
    /// 시크릿 파일과 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets_path =
            env::var("SECRETS_PATH").unwrap_or_else(|_| DEFAULT_SECRETS_PATH.to_string());
        let secrets = SecretStore::load(&secrets_path)?;

        Self::from_sources(&secrets, |key| env::var(key).ok())
    }

    /// 주어진 시크릿 저장소와 환경 조회 함수로 설정 구성
    pub fn from_sources<F>(secrets: &SecretStore, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };

        let app_password = secrets
            .get("APP_PASSWORD")
            .map(str::to_string)
            .or_else(|| lookup("APP_PASSWORD"))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "APP_PASSWORD が設定されていません。既定のパスワードを使用します。本番環境では必ず設定してください。"
                );
                DEFAULT_APP_PASSWORD.to_string()
            });

        // 빈 시크릿 키는 없는 것으로 보고 환경 변수로 넘어감
        let openai_api_key = secrets
            .get("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|key| !key.is_empty());
        if openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY が設定されていません。生成リクエストは失敗します。");
        }

        let openai_api_base = lookup("OPENAI_API_BASE").filter(|base| !base.is_empty());

        let completion_timeout = match lookup("OPENAI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
        };

        let few_shot_enabled = match lookup("FEW_SHOT_ENABLED") {
            Some(raw) => raw
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidFlag("FEW_SHOT_ENABLED", raw))?,
            None => false,
        };

        let dataset_path = lookup("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        Ok(Self {
            server_host,
            server_port,
            app_password,
            openai_api_key,
            openai_api_base,
            completion_timeout,
            few_shot_enabled,
            dataset_path,
        })
    }
}

/// TOML 형식의 시크릿 저장소
///
/// 최상위 문자열 키만 읽습니다. 파일이 없으면 빈 저장소로 취급합니다.
#[derive(Debug, Default, Clone)]
pub struct SecretStore {
    values: HashMap<String, String>,
}

impl SecretStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let store = Self::from_toml_str(&contents)?;
                tracing::info!(path = %path.display(), keys = store.values.len(), "Loaded secrets file");
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No secrets file, using environment only");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::SecretsUnreadable(e.to_string())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(contents).map_err(|e| ConfigError::InvalidSecrets(e.to_string()))?;

        let values = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(String),
    #[error("Invalid timeout seconds: {0}")]
    InvalidTimeout(String),
    #[error("Invalid boolean for {0}: {1}")]
    InvalidFlag(&'static str, String),
    #[error("Secrets file could not be read: {0}")]
    SecretsUnreadable(String),
    #[error("Secrets file is not valid TOML: {0}")]
    InvalidSecrets(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_apply_defaults_when_nothing_is_set() {
        let config = AppConfig::from_sources(&SecretStore::default(), env_of(&[])).unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.app_password, DEFAULT_APP_PASSWORD);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.completion_timeout, Duration::from_secs(60));
        assert!(!config.few_shot_enabled);
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
    }

    #[test]
    fn secrets_should_take_precedence_over_env() {
        let secrets = SecretStore::from_toml_str(
            r#"
            APP_PASSWORD = "from-secrets"
            OPENAI_API_KEY = "sk-secrets"
            "#,
        )
        .unwrap();
        let env = env_of(&[("APP_PASSWORD", "from-env"), ("OPENAI_API_KEY", "sk-env")]);

        let config = AppConfig::from_sources(&secrets, env).unwrap();

        assert_eq!(config.app_password, "from-secrets");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-secrets"));
    }

    #[test]
    fn env_should_be_used_when_secret_is_missing() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-env"), ("APP_PASSWORD", "pw")]);

        let config = AppConfig::from_sources(&SecretStore::default(), env).unwrap();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.app_password, "pw");
    }

    #[test]
    fn empty_api_key_should_be_treated_as_missing() {
        let env = env_of(&[("OPENAI_API_KEY", "")]);

        let config = AppConfig::from_sources(&SecretStore::default(), env).unwrap();

        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn empty_secret_api_key_should_fall_back_to_env() {
        let secrets = SecretStore::from_toml_str(r#"OPENAI_API_KEY = """#).unwrap();
        let env = env_of(&[("OPENAI_API_KEY", "sk-env")]);

        let config = AppConfig::from_sources(&secrets, env).unwrap();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn empty_secret_password_should_still_win_over_env() {
        let secrets = SecretStore::from_toml_str(r#"APP_PASSWORD = """#).unwrap();
        let env = env_of(&[("APP_PASSWORD", "from-env")]);

        let config = AppConfig::from_sources(&secrets, env).unwrap();

        assert_eq!(config.app_password, "");
    }

    #[test]
    fn should_parse_few_shot_settings() {
        let env = env_of(&[("FEW_SHOT_ENABLED", "true"), ("DATASET_PATH", "data/rated.csv")]);

        let config = AppConfig::from_sources(&SecretStore::default(), env).unwrap();

        assert!(config.few_shot_enabled);
        assert_eq!(config.dataset_path, PathBuf::from("data/rated.csv"));
    }

    #[test]
    fn should_reject_invalid_port() {
        let result = AppConfig::from_sources(&SecretStore::default(), env_of(&[("SERVER_PORT", "abc")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn should_reject_invalid_flag() {
        let result =
            AppConfig::from_sources(&SecretStore::default(), env_of(&[("FEW_SHOT_ENABLED", "yes")]));
        assert!(matches!(result, Err(ConfigError::InvalidFlag("FEW_SHOT_ENABLED", _))));
    }

    #[test]
    fn should_reject_invalid_timeout() {
        let result = AppConfig::from_sources(
            &SecretStore::default(),
            env_of(&[("OPENAI_TIMEOUT_SECS", "-1")]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn secret_store_should_ignore_non_string_values() {
        let store = SecretStore::from_toml_str("PORT = 8080\nAPP_PASSWORD = \"pw\"").unwrap();
        assert_eq!(store.get("APP_PASSWORD"), Some("pw"));
        assert!(store.get("PORT").is_none());
    }

    #[test]
    fn secret_store_should_reject_invalid_toml() {
        let result = SecretStore::from_toml_str("APP_PASSWORD = ");
        assert!(matches!(result, Err(ConfigError::InvalidSecrets(_))));
    }

    #[test]
    fn missing_secrets_file_should_yield_empty_store() {
        let store = SecretStore::load("/nonexistent/dir/.secrets.toml").unwrap();
        assert!(store.get("APP_PASSWORD").is_none());
    }
}
