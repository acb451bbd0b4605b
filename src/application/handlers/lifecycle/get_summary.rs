//! GetSummary - Read-only lifecycle view of a user's assessments.
//!
//! Always computed fresh from current record states so it cannot disagree
//! with the state machine. The snapshot cache plays no part here.

use std::sync::Arc;

use crate::domain::assessment::{AssessmentError, DimensionRollup, RiskLevel};
use crate::domain::catalog::SeverityBand;
use crate::domain::foundation::{AssessmentId, CommandMetadata, Timestamp, UserId};
use crate::ports::{AssessmentStore, ProfileStore};

/// Query for the lifecycle summary.
#[derive(Debug, Clone)]
pub struct GetSummaryQuery {
    pub user_id: UserId,
    /// Include soft-deleted records with their grace-period countdown.
    pub include_deleted: bool,
}

/// One active record as shown in the summary.
#[derive(Debug, Clone)]
pub struct ActiveAssessmentOverview {
    pub id: AssessmentId,
    pub assessment_type: String,
    pub display_name: String,
    pub title: String,
    pub score: i32,
    pub severity_band: Option<SeverityBand>,
    pub taken_at: Timestamp,
}

/// One soft-deleted record with its restore window.
#[derive(Debug, Clone)]
pub struct DeletedAssessmentOverview {
    pub id: AssessmentId,
    pub assessment_type: String,
    pub display_name: String,
    pub title: String,
    pub deleted_at: Timestamp,
    pub reason: Option<String>,
    pub days_left_in_grace: i64,
    pub restore_deadline: Timestamp,
}

/// Current state of the derived per-user profile.
#[derive(Debug, Clone)]
pub struct ProfileOverview {
    pub risk_level: RiskLevel,
    pub primary_concerns: Vec<String>,
    pub recommended_approach: Option<String>,
    pub last_assessed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// Full lifecycle summary for a user.
#[derive(Debug, Clone)]
pub struct AssessmentSummary {
    pub active_assessments: Vec<ActiveAssessmentOverview>,
    pub deleted_assessments: Vec<DeletedAssessmentOverview>,
    /// None until a recompute has ever run for the user.
    pub user_profile: Option<ProfileOverview>,
    pub overall_assessments: Vec<DimensionRollup>,
}

/// Handler for the lifecycle summary query.
pub struct GetSummaryHandler {
    assessments: Arc<dyn AssessmentStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl GetSummaryHandler {
    pub fn new(assessments: Arc<dyn AssessmentStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            assessments,
            profiles,
        }
    }

    pub async fn handle(
        &self,
        query: GetSummaryQuery,
        _metadata: CommandMetadata,
    ) -> Result<AssessmentSummary, AssessmentError> {
        let now = Timestamp::now();
        let records = self.assessments.find_by_user(&query.user_id).await?;

        let mut active_assessments = Vec::new();
        let mut deleted_assessments = Vec::new();
        for record in &records {
            if record.is_active() {
                active_assessments.push(ActiveAssessmentOverview {
                    id: *record.id(),
                    assessment_type: record.assessment_type().code().to_string(),
                    display_name: record.assessment_type().display_name().to_string(),
                    title: record.title().to_string(),
                    score: record.score(),
                    severity_band: record.severity_band(),
                    taken_at: *record.taken_at(),
                });
                continue;
            }
            if !query.include_deleted {
                continue;
            }
            let (Some(deleted_at), Some(restore_deadline)) =
                (record.deleted_at(), record.restore_deadline())
            else {
                continue;
            };
            deleted_assessments.push(DeletedAssessmentOverview {
                id: *record.id(),
                assessment_type: record.assessment_type().code().to_string(),
                display_name: record.assessment_type().display_name().to_string(),
                title: record.title().to_string(),
                deleted_at,
                reason: record.deletion_reason().map(String::from),
                days_left_in_grace: record.days_left_in_grace(&now).unwrap_or(0),
                restore_deadline,
            });
        }

        active_assessments.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        deleted_assessments.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

        let user_profile = self
            .profiles
            .find_by_user(&query.user_id)
            .await?
            .map(|profile| ProfileOverview {
                risk_level: profile.risk_level(),
                primary_concerns: profile.primary_concerns().to_vec(),
                recommended_approach: profile.recommended_approach().map(String::from),
                last_assessed_at: profile.last_assessed_at().copied(),
                updated_at: *profile.updated_at(),
            });
        let overall_assessments = self.profiles.find_rollups(&query.user_id).await?;

        Ok(AssessmentSummary {
            active_assessments,
            deleted_assessments,
            user_profile,
            overall_assessments,
        })
    }
}
