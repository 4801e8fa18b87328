//! In-memory submission sink.
//!
//! Holds accepted submissions for the lifetime of the process, enough for
//! the demo application list. Durable storage is deliberately out of scope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::value::ValueMap;
use crate::domain::{SubmissionReceipt, SubmissionSink};
use crate::error::FormResult;

/// One accepted submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub submission_id: Uuid,
    pub form_id: String,
    pub values: ValueMap,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct InMemorySubmissionStore {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<SubmissionRecord> {
        self.records.read().await.clone()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl SubmissionSink for InMemorySubmissionStore {
    async fn submit(&self, form_id: &str, values: ValueMap) -> FormResult<SubmissionReceipt> {
        let record = SubmissionRecord {
            submission_id: Uuid::new_v4(),
            form_id: form_id.to_string(),
            values,
            submitted_at: Utc::now(),
        };
        let receipt = SubmissionReceipt {
            submission_id: record.submission_id,
            form_id: record.form_id.clone(),
            submitted_at: record.submitted_at,
        };
        self.records.write().await.push(record);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::FieldValue;

    #[tokio::test]
    async fn test_submit_stores_values_unchanged() {
        let store = InMemorySubmissionStore::new();
        let mut values = ValueMap::new();
        values.insert("fullName".into(), FieldValue::from("Ada"));

        let receipt = store.submit("car_insurance", values.clone()).await.unwrap();

        let records = store.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].submission_id, receipt.submission_id);
        assert_eq!(records[0].values, values);
        assert_eq!(records[0].form_id, "car_insurance");
    }
}
