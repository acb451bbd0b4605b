//! In-memory deletion audit log for tests and local development.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::assessment::DeletionEvent;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::DeletionLog;

/// In-memory `DeletionLog`. Append-only, like the real one.
#[derive(Debug, Default)]
pub struct InMemoryDeletionLog {
    events: Mutex<Vec<DeletionEvent>>,
}

impl InMemoryDeletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries across all users.
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl DeletionLog for InMemoryDeletionLog {
    async fn append(&self, event: &DeletionEvent) -> Result<(), DomainError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<DeletionEvent>, DomainError> {
        let mut events: Vec<DeletionEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        events.truncate(limit);
        Ok(events)
    }
}
