use crate::domain::model::{Record, RecordKind};
use crate::domain::ports::{DocumentIndex, RecordSink};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub const DEPARTMENTS_COLLECTION: &str = "sustech_departments";
pub const COURSES_COLLECTION: &str = "sustech_courses";

pub fn collection_for(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Department => DEPARTMENTS_COLLECTION,
        RecordKind::Course => COURSES_COLLECTION,
    }
}

/// Writes every record into a document index, one call per record.
pub struct IndexSink<I: DocumentIndex> {
    index: I,
}

impl<I: DocumentIndex> IndexSink<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &I {
        &self.index
    }
}

#[async_trait]
impl<I: DocumentIndex> RecordSink for IndexSink<I> {
    async fn emit(&self, record: &Record) -> Result<()> {
        let document = serde_json::to_value(record)?;
        self.index
            .index(collection_for(record.kind()), document)
            .await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub collection: String,
    pub document: serde_json::Value,
}

/// In-process index, keeps documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    documents: Mutex<Vec<IndexedDocument>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self) -> Vec<IndexedDocument> {
        self.documents.lock().await.clone()
    }

    pub async fn collection(&self, name: &str) -> Vec<serde_json::Value> {
        self.documents
            .lock()
            .await
            .iter()
            .filter(|d| d.collection == name)
            .map(|d| d.document.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentIndex for MemoryIndex {
    async fn index(&self, collection: &str, document: serde_json::Value) -> Result<()> {
        self.documents.lock().await.push(IndexedDocument {
            collection: collection.to_string(),
            document,
        });
        Ok(())
    }
}

/// Stand-in for a search engine client: logs each document instead of
/// writing it anywhere.
#[derive(Debug, Default)]
pub struct LogIndex;

#[async_trait]
impl DocumentIndex for LogIndex {
    async fn index(&self, collection: &str, document: serde_json::Value) -> Result<()> {
        tracing::info!(collection, %document, "📇 index document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Course, Department};
    use serde_json::json;

    #[tokio::test]
    async fn test_records_route_to_collections_by_kind() {
        let sink = IndexSink::new(MemoryIndex::new());

        sink.emit(&Record::Department(Department {
            department_code: "MA".to_string(),
            department_name: "Mathematics".to_string(),
        }))
        .await
        .unwrap();
        sink.emit(&Record::Course(Course {
            course_id: "MA101".to_string(),
            course_name: "Calculus I".to_string(),
            credits: 4.0,
            department: "Mathematics".to_string(),
        }))
        .await
        .unwrap();

        let index = sink.index();
        assert_eq!(
            index.collection(DEPARTMENTS_COLLECTION).await,
            vec![json!({"department_code": "MA", "department_name": "Mathematics"})]
        );
        assert_eq!(
            index.collection(COURSES_COLLECTION).await,
            vec![json!({
                "course_id": "MA101",
                "course_name": "Calculus I",
                "credits": 4.0,
                "department": "Mathematics"
            })]
        );
        assert_eq!(index.documents().await.len(), 2);
    }
}
