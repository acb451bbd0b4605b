//! HTTP DTOs for assessment lifecycle endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    ActiveAssessmentOverview, AssessmentSummary, DeleteAllAssessmentsResult,
    DeleteAssessmentResult, DeletedAssessmentOverview, ProfileOverview, RestoreAssessmentResult,
};
use crate::domain::assessment::{DeletionEvent, DimensionRollup};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for deleting one assessment type.
///
/// An empty body `{}` is a cascading soft delete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssessmentRequest {
    /// Recompute the profile and rollups from the remaining records.
    #[serde(default = "default_cascade")]
    pub cascade: bool,
    /// Purge instead of soft delete. Irreversible.
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

fn default_cascade() -> bool {
    true
}

/// Request body for deleting every assessment a user has.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllAssessmentsRequest {
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub reason: Option<String>,
    /// Confirmation phrase, required for the soft bulk path.
    #[serde(default)]
    pub confirmation: Option<String>,
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryParams {
    #[serde(default)]
    pub include_deleted: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Titles touched by a single-type deletion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedDataDto {
    pub assessment_type: String,
    pub titles: Vec<String>,
}

/// Outcome of a single-type deletion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssessmentResponse {
    pub success: bool,
    pub affected_count: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_data: Option<AffectedDataDto>,
}

impl From<DeleteAssessmentResult> for DeleteAssessmentResponse {
    fn from(result: DeleteAssessmentResult) -> Self {
        Self {
            success: result.success,
            affected_count: result.affected_count,
            message: result.message,
            affected_data: result.affected.map(|affected| AffectedDataDto {
                assessment_type: affected.assessment_type,
                titles: affected.titles,
            }),
        }
    }
}

/// Outcome of a bulk deletion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllAssessmentsResponse {
    pub success: bool,
    pub affected_count: u32,
    pub message: String,
}

impl From<DeleteAllAssessmentsResult> for DeleteAllAssessmentsResponse {
    fn from(result: DeleteAllAssessmentsResult) -> Self {
        Self {
            success: result.success,
            affected_count: result.affected_count,
            message: result.message,
        }
    }
}

/// Outcome of a restore attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreAssessmentResponse {
    pub success: bool,
    pub restored_count: u32,
    pub message: String,
}

impl From<RestoreAssessmentResult> for RestoreAssessmentResponse {
    fn from(result: RestoreAssessmentResult) -> Self {
        Self {
            success: result.success,
            restored_count: result.restored_count,
            message: result.message,
        }
    }
}

/// Answer to the can-restore check.
#[derive(Debug, Clone, Serialize)]
pub struct CanRestoreResponse {
    pub can_restore: bool,
}

/// One active record in the summary view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAssessmentDto {
    pub id: String,
    pub assessment_type: String,
    pub display_name: String,
    pub title: String,
    pub score: i32,
    pub severity_band: Option<String>,
    pub taken_at: Timestamp,
}

impl From<ActiveAssessmentOverview> for ActiveAssessmentDto {
    fn from(overview: ActiveAssessmentOverview) -> Self {
        Self {
            id: overview.id.to_string(),
            assessment_type: overview.assessment_type,
            display_name: overview.display_name,
            title: overview.title,
            score: overview.score,
            severity_band: overview.severity_band.map(|band| band.as_str().to_string()),
            taken_at: overview.taken_at,
        }
    }
}

/// One soft-deleted record in the summary view, with its restore window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedAssessmentDto {
    pub id: String,
    pub assessment_type: String,
    pub display_name: String,
    pub title: String,
    pub deleted_at: Timestamp,
    pub reason: Option<String>,
    pub days_left_in_grace: i64,
    pub restore_deadline: Timestamp,
}

impl From<DeletedAssessmentOverview> for DeletedAssessmentDto {
    fn from(overview: DeletedAssessmentOverview) -> Self {
        Self {
            id: overview.id.to_string(),
            assessment_type: overview.assessment_type,
            display_name: overview.display_name,
            title: overview.title,
            deleted_at: overview.deleted_at,
            reason: overview.reason,
            days_left_in_grace: overview.days_left_in_grace,
            restore_deadline: overview.restore_deadline,
        }
    }
}

/// Derived per-user profile in the summary view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub risk_level: String,
    pub primary_concerns: Vec<String>,
    pub recommended_approach: Option<String>,
    pub last_assessed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl From<ProfileOverview> for ProfileDto {
    fn from(overview: ProfileOverview) -> Self {
        Self {
            risk_level: overview.risk_level.as_str().to_string(),
            primary_concerns: overview.primary_concerns,
            recommended_approach: overview.recommended_approach,
            last_assessed_at: overview.last_assessed_at,
            updated_at: overview.updated_at,
        }
    }
}

/// One per-dimension rollup in the summary view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupDto {
    pub dimension_key: String,
    pub level: String,
    pub score: i32,
    pub max_score: i32,
    pub computed_at: Timestamp,
}

impl From<DimensionRollup> for RollupDto {
    fn from(rollup: DimensionRollup) -> Self {
        Self {
            dimension_key: rollup.dimension_key,
            level: rollup.level.as_str().to_string(),
            score: rollup.score,
            max_score: rollup.max_score,
            computed_at: rollup.computed_at,
        }
    }
}

/// One audit-trail entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionEventDto {
    pub id: String,
    /// Absent for bulk events, which span every type.
    pub assessment_type: Option<String>,
    pub kind: String,
    pub reason: Option<String>,
    pub affected_count: u32,
    pub occurred_at: Timestamp,
}

impl From<DeletionEvent> for DeletionEventDto {
    fn from(event: DeletionEvent) -> Self {
        Self {
            id: event.id.to_string(),
            assessment_type: event.assessment_type.map(|t| t.code().to_string()),
            kind: event.kind.as_str().to_string(),
            reason: event.reason,
            affected_count: event.affected_count,
            occurred_at: event.occurred_at,
        }
    }
}

/// Full lifecycle summary for a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub active_assessments: Vec<ActiveAssessmentDto>,
    pub deleted_assessments: Vec<DeletedAssessmentDto>,
    pub user_profile: Option<ProfileDto>,
    pub overall_assessments: Vec<RollupDto>,
    /// Only populated when the caller asked for deleted records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_history: Option<Vec<DeletionEventDto>>,
}

impl From<AssessmentSummary> for SummaryResponse {
    fn from(summary: AssessmentSummary) -> Self {
        Self {
            active_assessments: summary
                .active_assessments
                .into_iter()
                .map(Into::into)
                .collect(),
            deleted_assessments: summary
                .deleted_assessments
                .into_iter()
                .map(Into::into)
                .collect(),
            user_profile: summary.user_profile.map(Into::into),
            overall_assessments: summary
                .overall_assessments
                .into_iter()
                .map(Into::into)
                .collect(),
            deletion_history: None,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Transient store or cache failure the caller may retry.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "SERVICE_UNAVAILABLE".to_string(),
            message: message.into(),
            details: Some(serde_json::json!({ "retryable": true })),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
