//! Outbound SMS through the Twilio Messages API.

use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("SMS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SMS provider rejected message (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("SMS dispatch task aborted: {0}")]
    Aborted(String),
}

/// Provider-assigned message identifier.
pub type DeliveryId = String;

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryId, DeliveryError>;
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Deserialize)]
struct ProviderError {
    message: Option<String>,
}

pub struct TwilioSender {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSender {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String
    ) -> Self {
        Self { http, base_url, account_sid, auth_token, from_number }
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> Result<DeliveryId, DeliveryError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        );
        let resp = self.http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ProviderError>().await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string());
            return Err(DeliveryError::Rejected { status: status.as_u16(), message });
        }

        let resource = resp.json::<MessageResource>().await?;
        info!("SMS to {} accepted as {}", to, resource.sid);
        Ok(resource.sid)
    }
}
