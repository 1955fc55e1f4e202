use crate::domain::model::{Record, RunOutcome};
use crate::domain::ports::RecordSink;
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use std::io::{Stdout, Write};
use std::sync::Mutex;

pub const COMPLETION_MARKER: &str = "OK";

/// Prints one JSON object per record, then `OK` once a run completes.
pub struct ConsoleSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock().map_err(|_| CatalogError::SinkError {
            message: "console writer lock poisoned".to_string(),
        })?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for ConsoleSink<W> {
    async fn emit(&self, record: &Record) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.write_line(&line)
    }

    async fn finish(&self, outcome: RunOutcome) -> Result<()> {
        if outcome == RunOutcome::Completed {
            self.write_line(COMPLETION_MARKER)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Course, Department};

    fn output(sink: ConsoleSink<Vec<u8>>) -> Vec<String> {
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_records_print_as_field_mappings() {
        let sink = ConsoleSink::new(Vec::new());
        sink.emit(&Record::Department(Department {
            department_code: "CS".to_string(),
            department_name: "Computer Science".to_string(),
        }))
        .await
        .unwrap();
        sink.emit(&Record::Course(Course {
            course_id: "CS101".to_string(),
            course_name: "Intro to Programming".to_string(),
            credits: 3.5,
            department: "Computer Science".to_string(),
        }))
        .await
        .unwrap();
        sink.finish(RunOutcome::Completed).await.unwrap();

        assert_eq!(
            output(sink),
            vec![
                r#"{"department_code":"CS","department_name":"Computer Science"}"#,
                r#"{"course_id":"CS101","course_name":"Intro to Programming","credits":3.5,"department":"Computer Science"}"#,
                "OK",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_marker_after_early_stop() {
        let sink = ConsoleSink::new(Vec::new());
        sink.finish(RunOutcome::StoppedAfterFirstCourse)
            .await
            .unwrap();

        assert!(output(sink).is_empty());
    }
}
