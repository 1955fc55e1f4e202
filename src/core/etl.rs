use crate::core::{Pipeline, RunOutcome, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> P {
        self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting catalog scrape");

        // Extract
        let page = self.pipeline.extract().await?;
        tracing::info!("📥 Downloaded {} ({} bytes)", page.url, page.body.len());
        self.monitor.log_stats("Extract");

        // Transform
        let extraction = self.pipeline.transform(page).await?;
        tracing::info!(
            "🔍 Parsed {} departments and {} courses",
            extraction.department_count(),
            extraction.course_count()
        );
        self.monitor.log_stats("Transform");

        // Load
        let report = self.pipeline.load(extraction).await?;
        self.monitor.log_stats("Load");

        match report.outcome {
            RunOutcome::Completed => tracing::info!(
                "✅ Emitted {} departments and {} courses in {:?}",
                report.departments_emitted,
                report.courses_emitted,
                started.elapsed()
            ),
            RunOutcome::StoppedAfterFirstCourse => tracing::info!(
                "⏹️ Stopped early after {} departments and {} course in {:?}",
                report.departments_emitted,
                report.courses_emitted,
                started.elapsed()
            ),
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
