pub mod places;
pub mod sms;

use std::time::Duration;

/// HTTP client shared by one provider, bounded by the configured per-call timeout.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}
