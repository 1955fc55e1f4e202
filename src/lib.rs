pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::http::HttpFetcher;
pub use crate::adapters::sink::{build_sink, ConsoleSink, FileSink, IndexSink, LogIndex, MemoryIndex};
pub use crate::adapters::storage::LocalStorage;
pub use crate::core::parser::{extract_records, parse_courses, parse_departments, CatalogDocument};
pub use crate::core::pipeline::{CatalogScraper, COURSES_URL};
pub use crate::core::{etl::EtlEngine, Course, Department, Record, RecordKind, RunOutcome, RunReport};
pub use crate::utils::error::{CatalogError, Result};
