//! Ownership trait for user-owned resources.
//!
//! This module provides the `OwnedByUser` trait that standardizes
//! ownership checking across all user-owned aggregates.
//!
//! # DRY Pattern
//!
//! Instead of each aggregate implementing its own `is_owner()` method
//! with ad-hoc error handling, they implement this trait which provides:
//! - Consistent method names across all aggregates
//! - A `check_ownership()` method that returns proper domain errors
//! - Clear semantics for audit logging
//!
//! # Example
//!
//! ```ignore
//! impl OwnedByUser for AssessmentRecord {
//!     fn owner_id(&self) -> &UserId {
//!         &self.user_id
//!     }
//! }
//!
//! // In a handler:
//! record.check_ownership(&user_id)?;  // Returns Err(Forbidden) if not owner
//! ```

use super::{DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
///
/// Implementors should return the `UserId` of the owning user.
/// The trait provides default implementations for ownership checking.
///
/// # Security Note
///
/// This trait is designed for single-owner resources. For shared resources
/// (e.g., clinician-shared), use a different authorization mechanism.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    ///
    /// Returns `true` if `user_id` matches `owner_id()`.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning an error if the user is not the owner.
    ///
    /// This is the preferred method to use in command handlers as it
    /// returns a properly formed `DomainError` with `Forbidden` code.
    ///
    /// # Example
    ///
    /// ```ignore
    /// pub async fn handle(&self, cmd: RestoreAssessmentCommand, metadata: CommandMetadata)
    ///     -> Result<(), DomainError>
    /// {
    ///     let record = self.store.find_by_id(cmd.assessment_id).await?
    ///         .ok_or_else(|| DomainError::new(ErrorCode::AssessmentNotFound, "Assessment not found"))?;
    ///
    ///     // Check ownership - returns Err(Forbidden) if not owner
    ///     record.check_ownership(&metadata.user_id)?;
    ///
    ///     // ... proceed with restore
    /// }
    /// ```
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}
