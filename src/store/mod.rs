mod memory;
mod redis;

pub use memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use log::{ info, warn };
use std::sync::Arc;
use thiserror::Error;
use crate::cli::Args;
use crate::error::ApiError;
use crate::models::first_aid::FirstAidEntry;
use crate::models::profile::{ EmergencyProfile, ProfileSubmission };

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store unreachable: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("stored record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub created: bool,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_first_aid(&self) -> Result<Vec<FirstAidEntry>, StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<EmergencyProfile>, StoreError>;

    /// Replaces every field of the profile stored under `user_id`, inserting it when absent.
    /// Concurrent writers for the same user race; the last write wins.
    async fn upsert_profile(
        &self,
        user_id: &str,
        submission: ProfileSubmission
    ) -> Result<Upserted, StoreError>;
}

pub async fn create_record_store(
    args: &Args
) -> Result<Arc<dyn RecordStore>, Box<dyn std::error::Error + Send + Sync>> {
    match args.store_type.to_lowercase().as_str() {
        "redis" => {
            let store = RedisStore::connect(&args.database_url, &args.store_key_prefix).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported record store type: {}", args.store_type)
                    )
                )
            ),
    }
}

pub async fn initialize_record_store(
    args: &Args
) -> Result<Arc<dyn RecordStore>, Box<dyn std::error::Error + Send + Sync>> {
    info!("Records will be stored in: {} at {}", args.store_type, args.database_url);
    create_record_store(args).await
}

/// Merges a submission over the previously stored record, keeping only `created_at`.
pub(crate) fn replace_profile(
    user_id: &str,
    existing: Option<&EmergencyProfile>,
    submission: ProfileSubmission,
    now: i64
) -> EmergencyProfile {
    if let Some(old) = existing {
        if submission.emergency_contacts.is_none() && !old.emergency_contacts.is_empty() {
            warn!(
                "Profile update for {} omits emergencyContacts; {} stored contact(s) will be cleared",
                user_id,
                old.emergency_contacts.len()
            );
        }
    }
    let created_at = existing.map(|p| p.created_at).unwrap_or(now);
    submission.into_profile(user_id.to_string(), created_at, now)
}
