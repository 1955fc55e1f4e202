use crate::domain::model::{Course, Department, Record, RunOutcome};
use crate::domain::ports::{RecordSink, Storage};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use tokio::sync::Mutex;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "catalog.zip";

#[derive(Debug, Default)]
struct Buffered {
    departments: Vec<Department>,
    courses: Vec<Course>,
}

/// Collects records during the run and exports them when the run finishes:
/// `departments.<fmt>` and `courses.<fmt>` per configured format, optionally
/// bundled into a single ZIP archive.
pub struct FileSink<S: Storage> {
    storage: S,
    formats: Vec<String>,
    compress: bool,
    buffer: Mutex<Buffered>,
}

impl<S: Storage> FileSink<S> {
    pub fn new(storage: S, formats: Vec<String>, compress: bool) -> Self {
        Self {
            storage,
            formats,
            compress,
            buffer: Mutex::new(Buffered::default()),
        }
    }

    fn render_files(&self, buffered: &Buffered) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();
        for format in &self.formats {
            files.push((
                format!("departments.{}", format),
                render(format, &buffered.departments)?,
            ));
            files.push((
                format!("courses.{}", format),
                render(format, &buffered.courses)?,
            ));
        }
        Ok(files)
    }
}

fn render<T: Serialize>(format: &str, rows: &[T]) -> Result<Vec<u8>> {
    match format {
        "json" => Ok(serde_json::to_vec_pretty(rows)?),
        // 驗證階段已限制格式，其餘皆為分隔字元格式
        other => {
            let delimiter = if other == "tsv" { b'\t' } else { b',' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            writer
                .into_inner()
                .map_err(|e| CatalogError::IoError(e.into_error()))
        }
    }
}

fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[async_trait]
impl<S: Storage> RecordSink for FileSink<S> {
    async fn emit(&self, record: &Record) -> Result<()> {
        let mut buffer = self.buffer.lock().await;
        match record {
            Record::Department(department) => buffer.departments.push(department.clone()),
            Record::Course(course) => buffer.courses.push(course.clone()),
        }
        Ok(())
    }

    async fn finish(&self, _outcome: RunOutcome) -> Result<()> {
        let files = {
            let buffer = self.buffer.lock().await;
            self.render_files(&buffer)?
        };

        if self.compress {
            let archive = zip_files(&files)?;
            tracing::debug!("Writing {} ({} bytes)", ARCHIVE_NAME, archive.len());
            self.storage.write_file(ARCHIVE_NAME, &archive).await?;
            tracing::info!("💾 Exported {} files into {}", files.len(), ARCHIVE_NAME);
        } else {
            for (name, data) in &files {
                self.storage.write_file(name, data).await?;
                tracing::debug!("Wrote {} ({} bytes)", name, data.len());
            }
            tracing::info!("💾 Exported {} files", files.len());
        }

        Ok(())
    }
}
