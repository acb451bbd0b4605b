//! In-memory profile store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::assessment::{DimensionRollup, UserAssessmentProfile};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ProfileStore;

/// In-memory `ProfileStore`.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<Vec<UserAssessmentProfile>>,
    rollups: Mutex<HashMap<String, Vec<DimensionRollup>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile, builder style.
    pub fn with_profile(self, profile: UserAssessmentProfile) -> Self {
        self.profiles.lock().unwrap().push(profile);
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAssessmentProfile>, DomainError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id() == user_id)
            .cloned())
    }

    async fn upsert(&self, profile: &UserAssessmentProfile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.iter().position(|p| p.user_id() == profile.user_id()) {
            Some(pos) => profiles[pos] = profile.clone(),
            None => profiles.push(profile.clone()),
        }
        Ok(())
    }

    async fn replace_rollups(
        &self,
        user_id: &UserId,
        rollups: &[DimensionRollup],
    ) -> Result<(), DomainError> {
        self.rollups
            .lock()
            .unwrap()
            .insert(user_id.as_str().to_string(), rollups.to_vec());
        Ok(())
    }

    async fn find_rollups(&self, user_id: &UserId) -> Result<Vec<DimensionRollup>, DomainError> {
        Ok(self
            .rollups
            .lock()
            .unwrap()
            .get(user_id.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::RiskLevel;

    #[tokio::test]
    async fn upsert_overwrites_on_user_id() {
        let user_id = UserId::new("user-1").unwrap();
        let store = InMemoryProfileStore::new();

        let mut profile = UserAssessmentProfile::fresh(user_id.clone());
        store.upsert(&profile).await.unwrap();

        profile.apply_recompute(RiskLevel::High, vec!["depression".to_string()], None, None);
        store.upsert(&profile).await.unwrap();

        let loaded = store.find_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(loaded.risk_level(), RiskLevel::High);
        assert_eq!(store.profiles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_rollups_is_wholesale() {
        let user_id = UserId::new("user-1").unwrap();
        let store = InMemoryProfileStore::new();
        let rollup = DimensionRollup {
            dimension_key: "depression".to_string(),
            level: crate::domain::catalog::DimensionLevel::Moderate,
            score: 12,
            max_score: 27,
            computed_at: crate::domain::foundation::Timestamp::now(),
        };

        store.replace_rollups(&user_id, &[rollup]).await.unwrap();
        assert_eq!(store.find_rollups(&user_id).await.unwrap().len(), 1);

        store.replace_rollups(&user_id, &[]).await.unwrap();
        assert!(store.find_rollups(&user_id).await.unwrap().is_empty());
    }
}
