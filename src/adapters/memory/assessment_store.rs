//! In-memory assessment store for tests and local development.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::assessment::{AssessmentRecord, LifecycleState};
use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{AssessmentId, DomainError, Timestamp, UserId};
use crate::ports::AssessmentStore;

/// In-memory `AssessmentStore` with the same conditional-transition
/// semantics as the postgres adapter: every transition checks the current
/// lifecycle state and reports `false` when the precondition no longer holds.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentStore {
    records: Mutex<Vec<AssessmentRecord>>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, builder style.
    pub fn with_record(self, record: AssessmentRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Adds a record at runtime.
    pub fn add_record(&self, record: AssessmentRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Number of records currently held, any lifecycle state.
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn insert(&self, record: &AssessmentRecord) -> Result<(), DomainError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<AssessmentRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_type(
        &self,
        user_id: &UserId,
        assessment_type: AssessmentType,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id() == user_id && r.assessment_type() == assessment_type)
            .cloned()
            .collect())
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id() == user_id && r.is_active())
            .cloned()
            .collect())
    }

    async fn soft_delete(
        &self,
        id: &AssessmentId,
        deleted_at: Timestamp,
        reason: Option<&str>,
    ) -> Result<bool, DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(record) if record.is_active() => {
                record.soft_delete(deleted_at, reason.map(String::from))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, id: &AssessmentId) -> Result<bool, DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(record) if record.is_soft_deleted() => {
                // Mechanical transition: grace-period eligibility is the
                // handler's check, matching the postgres conditional UPDATE.
                let restored = AssessmentRecord::reconstitute(
                    *record.id(),
                    record.user_id().clone(),
                    record.assessment_type(),
                    record.title().to_string(),
                    record.score(),
                    record.severity_band(),
                    record.responses().to_vec(),
                    record.structured_result().clone(),
                    *record.taken_at(),
                    LifecycleState::Active,
                );
                *record = restored;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge(&self, id: &AssessmentId) -> Result<bool, DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.iter().position(|r| r.id() == id) {
            Some(pos) => {
                records.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_soft_deleted_before(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<AssessmentRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches!(r.deleted_at(), Some(deleted_at) if deleted_at.is_before(&cutoff)))
            .cloned()
            .collect())
    }
}
