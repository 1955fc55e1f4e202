use crate::config::toml_config::{validate_provider, TomlConfig};
use crate::core::pipeline::COURSES_URL;
use crate::core::{ConfigProvider, SinkKind};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

static DEFAULT_FORMATS: LazyLock<Vec<String>> =
    LazyLock::new(|| vec!["csv".to_string(), "json".to_string()]);

const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Options left unset fall back to the TOML file (when `--config` is given)
/// and then to the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "catalog-etl")]
#[command(about = "Scrape the SUSTech course catalog into a record sink")]
pub struct CliConfig {
    /// Catalog page to scrape
    #[arg(long)]
    pub catalog_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where records are emitted
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Output directory for the file sink
    #[arg(long)]
    pub output_path: Option<String>,

    /// Export formats for the file sink (csv, tsv, json)
    #[arg(long, value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Bundle file sink output into a single ZIP archive
    #[arg(long)]
    pub zip: bool,

    /// Request timeout; no timeout when unset
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Stop right after the first course record (default: true)
    #[arg(long)]
    pub stop_after_first_course: Option<bool>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Print the resolved configuration and exit without fetching")]
    pub dry_run: bool,
}

impl CliConfig {
    /// 命令列明確給定的選項覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(url) = &self.catalog_url {
            config.source.url = url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.source.timeout_seconds = Some(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            config.source.user_agent = Some(user_agent.clone());
        }
        if let Some(stop) = self.stop_after_first_course {
            tracing::info!("🔧 stop_after_first_course overridden to: {}", stop);
            config.extract.stop_after_first_course = stop;
        }
        if let Some(sink) = self.sink {
            config.load.sink = sink;
        }
        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }
        if let Some(formats) = &self.formats {
            config.load.output_formats = formats.clone();
        }
        if self.zip {
            config.load.compress = true;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        if self.json_logs {
            config.monitoring.json_logs = true;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn catalog_url(&self) -> &str {
        self.catalog_url.as_deref().unwrap_or(COURSES_URL)
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn stop_after_first_course(&self) -> bool {
        self.stop_after_first_course.unwrap_or(true)
    }

    fn sink(&self) -> SinkKind {
        self.sink.unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_formats(&self) -> &[String] {
        self.formats.as_deref().unwrap_or(DEFAULT_FORMATS.as_slice())
    }

    fn compress(&self) -> bool {
        self.zip
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_single_course_behaviour() {
        let cli = CliConfig::parse_from(["catalog-etl"]);

        assert_eq!(cli.catalog_url(), COURSES_URL);
        assert!(cli.stop_after_first_course());
        assert_eq!(cli.sink(), SinkKind::Console);
        assert_eq!(cli.timeout(), None);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_parse_full_run_flags() {
        let cli = CliConfig::parse_from([
            "catalog-etl",
            "--stop-after-first-course",
            "false",
            "--sink",
            "file",
            "--formats",
            "csv,tsv",
            "--zip",
            "--timeout-secs",
            "15",
        ]);

        assert!(!cli.stop_after_first_course());
        assert_eq!(cli.sink(), SinkKind::File);
        assert_eq!(cli.output_formats(), &["csv", "tsv"]);
        assert!(cli.compress());
        assert_eq!(cli.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_explicit_flags_override_toml() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[source]
url = "https://course-tao.sustech.edu.cn/kcxxweb/KcxxwebChinesePC"
timeout_seconds = 30

[extract]
stop_after_first_course = true

[load]
sink = "file"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "catalog-etl",
            "--catalog-url",
            "http://localhost:9000/catalog",
            "--stop-after-first-course",
            "false",
        ]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.catalog_url(), "http://localhost:9000/catalog");
        assert!(!config.stop_after_first_course());
        // 未指定的選項沿用檔案設定
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.sink(), SinkKind::File);
    }

    #[test]
    fn test_json_logs_from_file_or_flag() {
        let mut config =
            TomlConfig::from_toml_str("[monitoring]\njson_logs = true\n").unwrap();
        CliConfig::parse_from(["catalog-etl"]).apply_overrides(&mut config);
        assert!(config.json_logs());

        let mut config = TomlConfig::default();
        assert!(!config.json_logs());
        CliConfig::parse_from(["catalog-etl", "--json-logs"]).apply_overrides(&mut config);
        assert!(config.json_logs());
    }
}
