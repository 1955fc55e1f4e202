use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to fetch catalog page: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Catalog page {url} returned HTTP status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Unexpected catalog page structure: {message}")]
    ParseStructureError { message: String },

    #[error("Invalid value for field '{field}': '{value}' ({reason})")]
    FieldFormatError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Sink error: {message}")]
    SinkError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    PageStructure,
    DataFormat,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn structure(message: impl Into<String>) -> Self {
        CatalogError::ParseStructureError {
            message: message.into(),
        }
    }

    pub fn field_format(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CatalogError::FieldFormatError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::FetchError(_) | CatalogError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            CatalogError::ParseStructureError { .. } => ErrorCategory::PageStructure,
            CatalogError::FieldFormatError { .. } => ErrorCategory::DataFormat,
            CatalogError::ZipError(_)
            | CatalogError::CsvError(_)
            | CatalogError::IoError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::SinkError { .. } => ErrorCategory::Output,
            CatalogError::ConfigError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::PageStructure | ErrorCategory::DataFormat => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a failed run, never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CatalogError::FetchError(_) => {
                "Check network connectivity to the catalog host, or set a longer --timeout-secs"
            }
            CatalogError::HttpStatusError { .. } => {
                "The catalog server rejected the request; verify --catalog-url and try again later"
            }
            CatalogError::ParseStructureError { .. } => {
                "The catalog page layout has changed; inspect the page HTML before re-running"
            }
            CatalogError::FieldFormatError { .. } => {
                "A table cell holds an unexpected value; inspect the offending row on the page"
            }
            CatalogError::ZipError(_) | CatalogError::IoError(_) => {
                "Check that the output path exists and is writable"
            }
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => {
                "Record serialization failed; try a different output format"
            }
            CatalogError::SinkError { .. } => "Check the configured sink",
            CatalogError::MissingConfigError { .. } => {
                "Check the --config path, or omit it to run with built-in defaults"
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and re-run"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the course catalog: {}", self),
            ErrorCategory::PageStructure => {
                format!("The course catalog page could not be understood: {}", self)
            }
            ErrorCategory::DataFormat => format!("The course catalog contains bad data: {}", self),
            ErrorCategory::Output => format!("Could not write scraped records: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_parse_errors_are_high_severity() {
        let err = CatalogError::structure("no <table> elements found");
        assert_eq!(err.category(), ErrorCategory::PageStructure);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = CatalogError::field_format("credits", "three", "not a number");
        assert_eq!(err.category(), ErrorCategory::DataFormat);
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'credits': 'three' (not a number)"
        );
    }

    #[test]
    fn test_http_status_is_network_error() {
        let err = CatalogError::HttpStatusError {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("503"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = CatalogError::MissingConfigError {
            field: "catalog.toml".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("--config"));

        let err = CatalogError::ConfigError {
            message: "TOML parsing error".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let errors = [
            CatalogError::HttpStatusError {
                url: "https://example.com".to_string(),
                status: 500,
            },
            CatalogError::structure("no <table> elements found"),
            CatalogError::field_format("credits", "", "empty"),
            CatalogError::SinkError {
                message: "closed".to_string(),
            },
        ];

        let codes: Vec<i32> = errors.iter().map(CatalogError::exit_code).collect();
        assert_eq!(codes, vec![2, 1, 1, 3]);
    }
}
