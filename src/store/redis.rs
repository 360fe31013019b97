use async_trait::async_trait;
use chrono::Utc;
use log::{ error, info };
use redis::{ AsyncCommands, Client };
use crate::models::first_aid::FirstAidEntry;
use crate::models::profile::{ EmergencyProfile, ProfileSubmission };
use super::{ replace_profile, RecordStore, StoreError, Upserted };

pub struct RedisStore {
    client: Client,
    key_prefix: String,
}

impl RedisStore {
    /// Opens the client and PINGs the server so that an unreachable store fails startup.
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let store = Self {
            client: Client::open(url)?,
            key_prefix: key_prefix.to_string(),
        };
        let mut conn = store.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Connected to record store at {}", url);
        Ok(store)
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

fn first_aid_key(prefix: &str) -> String {
    format!("{}first_aid", prefix)
}

fn profile_key(prefix: &str, user_id: &str) -> String {
    format!("{}profile:{}", prefix, user_id)
}

/// Decodes a first-aid list in stored order, logging and skipping malformed entries.
fn decode_first_aid(json_entries: &[String]) -> Vec<FirstAidEntry> {
    let mut entries = Vec::with_capacity(json_entries.len());
    for json_entry in json_entries {
        match serde_json::from_str::<FirstAidEntry>(json_entry) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                error!("Error parsing first-aid entry: {}", e);
            }
        }
    }
    entries
}

/// Serialized replacement record for `user_id`, and whether it is a first insert.
fn encode_upsert(
    user_id: &str,
    existing: Option<&EmergencyProfile>,
    submission: ProfileSubmission,
    now: i64
) -> Result<(String, Upserted), serde_json::Error> {
    let profile = replace_profile(user_id, existing, submission, now);
    Ok((serde_json::to_string(&profile)?, Upserted { created: existing.is_none() }))
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn list_first_aid(&self) -> Result<Vec<FirstAidEntry>, StoreError> {
        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(first_aid_key(&self.key_prefix), 0, -1).await?;
        Ok(decode_first_aid(&json_entries))
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<EmergencyProfile>, StoreError> {
        let mut conn = self.get_connection().await?;
        let raw: Option<String> = conn.get(profile_key(&self.key_prefix, user_id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        submission: ProfileSubmission
    ) -> Result<Upserted, StoreError> {
        let existing = self.get_profile(user_id).await?;
        let (json, upserted) = encode_upsert(
            user_id,
            existing.as_ref(),
            submission,
            Utc::now().timestamp()
        )?;

        let mut conn = self.get_connection().await?;
        let _: () = conn.set(profile_key(&self.key_prefix, user_id), json).await?;
        Ok(upserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::EmergencyContact;

    fn entry_json(title: &str) -> String {
        format!(
            r#"{{"title":"{}","description":"d","steps":["one","two"],"imageUrl":"u"}}"#,
            title
        )
    }

    #[test]
    fn keys_are_namespaced_by_prefix() {
        assert_eq!(first_aid_key("lifeline:"), "lifeline:first_aid");
        assert_eq!(profile_key("lifeline:", "user-42"), "lifeline:profile:user-42");
    }

    #[test]
    fn malformed_first_aid_entries_are_skipped_in_order() {
        let raw = vec![entry_json("Burns"), "{not json".to_string(), entry_json("Choking")];
        let entries = decode_first_aid(&raw);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Burns");
        assert_eq!(entries[1].title, "Choking");
        assert_eq!(entries[0].steps, vec!["one", "two"]);
    }

    #[test]
    fn upsert_reports_creation_from_existing_record() {
        let submission = ProfileSubmission {
            user_id: Some("u1".into()),
            name: "Ana".into(),
            emergency_contacts: Some(vec![EmergencyContact {
                name: "Ben".into(),
                phone: "+15550003".into(),
            }]),
            ..Default::default()
        };

        let (json, upserted) = encode_upsert("u1", None, submission.clone(), 100).unwrap();
        assert!(upserted.created);
        let stored: EmergencyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.created_at, 100);

        let (json, upserted) = encode_upsert("u1", Some(&stored), submission, 200).unwrap();
        assert!(!upserted.created);
        let updated: EmergencyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(updated.created_at, 100);
        assert_eq!(updated.updated_at, 200);
        assert_eq!(updated.emergency_contacts.len(), 1);
    }
}
