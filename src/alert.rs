//! SOS alert fan-out: one SMS per emergency contact, sent concurrently and joined.

use futures::future::join_all;
use log::{ error, info, warn };
use std::sync::Arc;
use crate::error::{ ApiError, ApiResult };
use crate::models::profile::{ EmergencyContact, EmergencyProfile };
use crate::services::sms::{ DeliveryError, DeliveryId, MessageSender };
use crate::store::RecordStore;

#[derive(Debug)]
pub struct DeliveryOutcome {
    pub contact: EmergencyContact,
    pub result: Result<DeliveryId, DeliveryError>,
}

/// Per-contact outcomes, in the order the contacts are stored.
#[derive(Debug, Default)]
pub struct AlertReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl AlertReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

pub fn alert_message(profile: &EmergencyProfile) -> String {
    format!(
        "EMERGENCY ALERT: {} needs help. Blood group: {}. Contact: {}.",
        profile.name,
        profile.blood_group,
        profile.phone
    )
}

/// Loads the profile for `user_id` and notifies every contact.
///
/// Individual delivery failures are recorded in the report and never fail the call;
/// only a missing profile, a store failure or an unconfigured `sender` does.
pub async fn send_alert(
    store: &dyn RecordStore,
    sender: Option<Arc<dyn MessageSender>>,
    user_id: &str
) -> ApiResult<AlertReport> {
    let profile = store
        .get_profile(user_id).await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    let sender = sender.ok_or_else(||
        ApiError::Configuration("SMS provider is not configured".into())
    )?;

    if profile.emergency_contacts.is_empty() {
        warn!("SOS alert for {} has no emergency contacts to notify", user_id);
        return Ok(AlertReport::default());
    }

    let body = Arc::new(alert_message(&profile));
    info!("Dispatching SOS alert for {} to {} contact(s)", user_id, profile.emergency_contacts.len());

    let handles: Vec<_> = profile.emergency_contacts
        .iter()
        .map(|contact| {
            let sender = Arc::clone(&sender);
            let body = Arc::clone(&body);
            let phone = contact.phone.clone();
            tokio::spawn(async move { sender.send(&phone, &body).await })
        })
        .collect();

    let results = join_all(handles).await;

    let outcomes = profile.emergency_contacts
        .into_iter()
        .zip(results)
        .map(|(contact, joined)| {
            let result = joined.unwrap_or_else(|e| Err(DeliveryError::Aborted(e.to_string())));
            match &result {
                Ok(id) => info!("Alert delivered to {} ({})", contact.name, id),
                Err(e) => error!("Failed to alert {} at {}: {}", contact.name, contact.phone, e),
            }
            DeliveryOutcome { contact, result }
        })
        .collect();

    Ok(AlertReport { outcomes })
}
