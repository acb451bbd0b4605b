//! Deletion audit events.
//!
//! Append-only trail of every lifecycle mutation: what was deleted or
//! restored, when, why, and how many records it touched. Events are never
//! updated or removed, even when the records they describe are purged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::AssessmentType;
use crate::domain::foundation::{DeletionEventId, Timestamp, UserId};

/// What kind of lifecycle mutation an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionKind {
    /// User-initiated soft delete (restorable within grace).
    Soft,
    /// User-initiated permanent delete.
    Permanent,
    /// User-initiated restore of a soft-deleted record.
    Restore,
    /// Sweeper purge of records whose grace period lapsed.
    Purge,
}

impl DeletionKind {
    /// Returns the storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionKind::Soft => "soft",
            DeletionKind::Permanent => "permanent",
            DeletionKind::Restore => "restore",
            DeletionKind::Purge => "purge",
        }
    }

    /// Parses a stored kind, returning None for unrecognized values.
    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "soft" => Some(DeletionKind::Soft),
            "permanent" => Some(DeletionKind::Permanent),
            "restore" => Some(DeletionKind::Restore),
            "purge" => Some(DeletionKind::Purge),
            _ => None,
        }
    }
}

impl fmt::Display for DeletionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionEvent {
    pub id: DeletionEventId,
    pub user_id: UserId,
    /// The instrument affected, or None for operations spanning all types.
    pub assessment_type: Option<AssessmentType>,
    pub kind: DeletionKind,
    pub reason: Option<String>,
    /// How many records the operation actually transitioned.
    pub affected_count: u32,
    pub occurred_at: Timestamp,
}

impl DeletionEvent {
    /// Records a deletion or restore affecting a single instrument type.
    pub fn for_type(
        user_id: UserId,
        assessment_type: AssessmentType,
        kind: DeletionKind,
        reason: Option<String>,
        affected_count: u32,
    ) -> Self {
        Self {
            id: DeletionEventId::new(),
            user_id,
            assessment_type: Some(assessment_type),
            kind,
            reason,
            affected_count,
            occurred_at: Timestamp::now(),
        }
    }

    /// Records an operation spanning every instrument type.
    pub fn bulk(
        user_id: UserId,
        kind: DeletionKind,
        reason: Option<String>,
        affected_count: u32,
    ) -> Self {
        Self {
            id: DeletionEventId::new(),
            user_id,
            assessment_type: None,
            kind,
            reason,
            affected_count,
            occurred_at: Timestamp::now(),
        }
    }

    /// True when the event covers all instrument types at once.
    pub fn is_bulk(&self) -> bool {
        self.assessment_type.is_none()
    }
}
