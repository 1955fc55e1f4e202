pub mod etl;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{
    CatalogPage, Course, Department, Extraction, Record, RecordKind, RunOutcome, RunReport,
    SinkKind,
};
pub use crate::domain::ports::{ConfigProvider, DocumentIndex, Pipeline, RecordSink, Storage};
pub use crate::utils::error::Result;
