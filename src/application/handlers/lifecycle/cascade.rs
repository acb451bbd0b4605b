//! Cascade recomputation shared by the lifecycle handlers.
//!
//! Whenever the set of active records changes, the derived profile and the
//! overall rollup rows must stop reflecting removed records. Both paths
//! rewrite derived state only; they never touch assessment records.

use crate::domain::assessment::{recompute_from_records, UserAssessmentProfile};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{AssessmentStore, ProfileStore};

/// Recomputes the user's profile and rollups from the current record set.
///
/// `last_assessed_at` stays monotonic through this path; deleting the
/// newest record does not rewind it.
pub(crate) async fn recompute_user_aggregates(
    assessments: &dyn AssessmentStore,
    profiles: &dyn ProfileStore,
    user_id: &UserId,
    now: Timestamp,
) -> Result<(), DomainError> {
    let records = assessments.find_by_user(user_id).await?;
    let recompute = recompute_from_records(&records, now);

    let mut profile = profiles
        .find_by_user(user_id)
        .await?
        .unwrap_or_else(|| UserAssessmentProfile::fresh(user_id.clone()));
    profile.apply_recompute(
        recompute.risk_level,
        recompute.primary_concerns,
        recompute.recommended_approach,
        recompute.newest_taken_at,
    );

    profiles.upsert(&profile).await?;
    profiles.replace_rollups(user_id, &recompute.dimensions).await?;
    Ok(())
}

/// Clears the user's profile and rollups after a full deletion.
///
/// The one path allowed to rewind `last_assessed_at`.
pub(crate) async fn reset_user_aggregates(
    profiles: &dyn ProfileStore,
    user_id: &UserId,
) -> Result<(), DomainError> {
    let mut profile = profiles
        .find_by_user(user_id)
        .await?
        .unwrap_or_else(|| UserAssessmentProfile::fresh(user_id.clone()));
    profile.reset();

    profiles.upsert(&profile).await?;
    profiles.replace_rollups(user_id, &[]).await?;
    Ok(())
}
