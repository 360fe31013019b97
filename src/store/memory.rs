use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::models::first_aid::FirstAidEntry;
use crate::models::profile::{ EmergencyProfile, ProfileSubmission };
use super::{ replace_profile, RecordStore, StoreError, Upserted };

/// Process-local store for `STORE_TYPE=memory` and tests.
#[derive(Default)]
pub struct MemoryStore {
    first_aid: RwLock<Vec<FirstAidEntry>>,
    profiles: RwLock<HashMap<String, EmergencyProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_aid(entries: Vec<FirstAidEntry>) -> Self {
        Self {
            first_aid: RwLock::new(entries),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub(crate) async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_first_aid(&self) -> Result<Vec<FirstAidEntry>, StoreError> {
        Ok(self.first_aid.read().await.clone())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<EmergencyProfile>, StoreError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        submission: ProfileSubmission
    ) -> Result<Upserted, StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = replace_profile(
            user_id,
            profiles.get(user_id),
            submission,
            Utc::now().timestamp()
        );
        let created = profiles.insert(user_id.to_string(), profile).is_none();
        Ok(Upserted { created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::EmergencyContact;

    fn submission(name: &str) -> ProfileSubmission {
        ProfileSubmission {
            user_id: Some("u1".into()),
            name: name.into(),
            blood_group: "A-".into(),
            emergency_contacts: Some(vec![EmergencyContact {
                name: "Kim".into(),
                phone: "+15550002".into(),
            }]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_record() {
        let store = MemoryStore::new();
        let first = store.upsert_profile("u1", submission("Lee")).await.unwrap();
        let second = store.upsert_profile("u1", submission("Lee")).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(store.profile_count().await, 1);
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let store = MemoryStore::new();
        store.upsert_profile("u1", submission("Lee")).await.unwrap();
        let created_at = store.get_profile("u1").await.unwrap().unwrap().created_at;

        let replacement = ProfileSubmission {
            user_id: Some("u1".into()),
            name: "Lee Park".into(),
            ..Default::default()
        };
        store.upsert_profile("u1", replacement).await.unwrap();

        let stored = store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Lee Park");
        assert!(stored.blood_group.is_empty());
        assert!(stored.emergency_contacts.is_empty());
        assert_eq!(stored.created_at, created_at);
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_profile("nobody").await.unwrap().is_none());
    }
}
