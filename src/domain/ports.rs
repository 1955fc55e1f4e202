use crate::domain::model::{CatalogPage, Extraction, Record, RunOutcome, RunReport, SinkKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_url(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn user_agent(&self) -> Option<&str>;
    fn stop_after_first_course(&self) -> bool;
    fn sink(&self) -> SinkKind;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
}

/// Destination for scraped records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn emit(&self, record: &Record) -> Result<()>;

    /// Called once after the last record of a run that did not fault.
    async fn finish(&self, _outcome: RunOutcome) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait DocumentIndex: Send + Sync {
    async fn index(&self, collection: &str, document: serde_json::Value) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<CatalogPage>;
    async fn transform(&self, page: CatalogPage) -> Result<Extraction>;
    async fn load(&self, extraction: Extraction) -> Result<RunReport>;
}

#[async_trait]
impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    async fn emit(&self, record: &Record) -> Result<()> {
        (**self).emit(record).await
    }

    async fn finish(&self, outcome: RunOutcome) -> Result<()> {
        (**self).finish(outcome).await
    }
}
