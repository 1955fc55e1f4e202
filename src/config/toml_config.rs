use crate::core::pipeline::COURSES_URL;
use crate::core::{ConfigProvider, SinkKind};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: COURSES_URL.to_string(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// 只輸出第一筆課程後即結束
    pub stop_after_first_course: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            stop_after_first_course: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub sink: SinkKind,
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Console,
            output_path: "./output".to_string(),
            output_formats: vec!["csv".to_string(), "json".to_string()],
            compress: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::MissingConfigError {
                field: path.as_ref().display().to_string(),
            },
            _ => CatalogError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring.json_logs
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_url(&self) -> &str {
        &self.source.url
    }

    fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn user_agent(&self) -> Option<&str> {
        self.source.user_agent.as_deref()
    }

    fn stop_after_first_course(&self) -> bool {
        self.extract.stop_after_first_course
    }

    fn sink(&self) -> SinkKind {
        self.load.sink
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.load.compress
    }
}

/// Checks shared by every `ConfigProvider`.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_url("source.url", config.catalog_url())?;

    if let Some(timeout) = config.timeout() {
        validation::validate_range(
            "source.timeout_seconds",
            timeout.as_secs(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
    }

    if let Some(user_agent) = config.user_agent() {
        validation::validate_non_empty_string("source.user_agent", user_agent)?;
    }

    if config.sink() == SinkKind::File {
        validation::validate_path("load.output_path", config.output_path())?;
        validation::validate_output_formats("load.output_formats", config.output_formats())?;
    }

    Ok(())
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
url = "https://course-tao.sustech.edu.cn/kcxxweb/KcxxwebChinesePC"
timeout_seconds = 20
user_agent = "catalog-etl/0.1"

[extract]
stop_after_first_course = false

[load]
sink = "file"
output_path = "./catalog-output"
output_formats = ["csv", "tsv"]
compress = true

[monitoring]
enabled = true
json_logs = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.user_agent(), Some("catalog-etl/0.1"));
        assert!(!config.stop_after_first_course());
        assert_eq!(config.sink(), SinkKind::File);
        assert_eq!(config.output_formats(), &["csv", "tsv"]);
        assert!(config.compress());
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.catalog_url(), COURSES_URL);
        assert_eq!(config.timeout(), None);
        assert!(config.stop_after_first_course());
        assert_eq!(config.sink(), SinkKind::Console);
        assert!(!config.monitoring_enabled());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CATALOG_ETL_TEST_URL", "https://mirror.example.edu/catalog");

        let toml_content = r#"
[source]
url = "${CATALOG_ETL_TEST_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.url, "https://mirror.example.edu/catalog");

        std::env::remove_var("CATALOG_ETL_TEST_URL");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let config =
            TomlConfig::from_toml_str("[source]\nurl = \"${CATALOG_ETL_UNSET_VAR}\"\n").unwrap();

        assert_eq!(config.source.url, "${CATALOG_ETL_UNSET_VAR}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = TomlConfig::default();
        config.source.timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.load.sink = SinkKind::File;
        config.load.output_formats = vec!["xlsx".to_string()];
        assert!(config.validate().is_err());

        // 非檔案輸出時不檢查格式
        config.load.sink = SinkKind::Console;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[source\nurl = 1").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let err = TomlConfig::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingConfigError { ref field } if field.ends_with("absent.toml")
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[load]\nsink = \"index\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.sink(), SinkKind::Index);
    }
}
