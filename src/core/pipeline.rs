use crate::adapters::http::HttpFetcher;
use crate::core::parser::{extract_records, CatalogDocument};
use crate::core::{
    CatalogPage, ConfigProvider, Extraction, Pipeline, RecordKind, RecordSink, RunOutcome,
    RunReport,
};
use crate::utils::error::Result;
use chrono::Utc;

pub const COURSES_URL: &str = "https://course-tao.sustech.edu.cn/kcxxweb/KcxxwebChinesePC";

/// Fetches the catalog page, parses departments and courses, and pushes every
/// record into the sink.
pub struct CatalogScraper<K: RecordSink, C: ConfigProvider> {
    pub(crate) sink: K,
    pub(crate) config: C,
    pub(crate) fetcher: HttpFetcher,
}

impl<K: RecordSink, C: ConfigProvider> CatalogScraper<K, C> {
    pub fn new(sink: K, config: C) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config)?;
        Ok(Self {
            sink,
            config,
            fetcher,
        })
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    pub async fn run(&self) -> Result<RunReport> {
        let page = self.extract().await?;
        let extraction = self.transform(page).await?;
        self.load(extraction).await
    }
}

#[async_trait::async_trait]
impl<K: RecordSink, C: ConfigProvider> Pipeline for CatalogScraper<K, C> {
    async fn extract(&self) -> Result<CatalogPage> {
        self.fetcher.fetch_page(self.config.catalog_url()).await
    }

    async fn transform(&self, page: CatalogPage) -> Result<Extraction> {
        // Html 不是 Send，解析必須在同步區段內完成
        let document = CatalogDocument::parse(&page.body);
        tracing::debug!("Catalog page contains {} tables", document.table_count());

        Ok(extract_records(
            &document,
            self.config.stop_after_first_course(),
        ))
    }

    async fn load(&self, extraction: Extraction) -> Result<RunReport> {
        let mut departments_emitted = 0;
        let mut courses_emitted = 0;

        for record in &extraction.records {
            self.sink.emit(record).await?;
            match record.kind() {
                RecordKind::Department => departments_emitted += 1,
                RecordKind::Course => courses_emitted += 1,
            }
        }

        let outcome = extraction.end?;
        if outcome == RunOutcome::StoppedAfterFirstCourse {
            tracing::info!("🛑 Stopping after the first course record");
        }
        self.sink.finish(outcome).await?;

        Ok(RunReport {
            catalog_url: self.config.catalog_url().to_string(),
            departments_emitted,
            courses_emitted,
            outcome,
            finished_at: Utc::now(),
        })
    }
}
