use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_code: String,
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub credits: f64,
    pub department: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Department,
    Course,
}

/// 單筆爬取結果，序列化後為扁平的欄位對應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Department(Department),
    Course(Course),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Department(_) => RecordKind::Department,
            Record::Course(_) => RecordKind::Course,
        }
    }
}

impl From<Department> for Record {
    fn from(department: Department) -> Self {
        Record::Department(department)
    }
}

impl From<Course> for Record {
    fn from(course: Course) -> Self {
        Record::Course(course)
    }
}

/// The downloaded catalog page, before any parsing.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub url: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every course table was walked to the end.
    Completed,
    StoppedAfterFirstCourse,
}

/// Records produced by one walk over the page, in emission order.
///
/// A walk stops at the first malformed element. The records parsed before it
/// are kept so they can still be emitted, and the fault is reported after
/// them.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub end: crate::utils::error::Result<RunOutcome>,
}

impl Extraction {
    pub fn department_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind() == RecordKind::Department)
            .count()
    }

    pub fn course_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind() == RecordKind::Course)
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub catalog_url: String,
    pub departments_emitted: usize,
    pub courses_emitted: usize,
    pub outcome: RunOutcome,
    pub finished_at: DateTime<Utc>,
}

/// Where emitted records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Console,
    File,
    Index,
}
