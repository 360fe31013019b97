use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address for the HTTP server to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the HTTP server to listen on.
    #[arg(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// The single browser origin allowed to call the API (credentialed CORS).
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Timeout in seconds applied to every outbound provider call.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,

    // --- Record Store Args ---
    /// Record store type (redis, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "redis")]
    pub store_type: String,

    /// Record store connection URI (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "DATABASE_URL", default_value = "redis://127.0.0.1:6379")]
    pub database_url: String,

    /// Prefix for every key written to the record store.
    #[arg(long, env = "STORE_KEY_PREFIX", default_value = "lifeline:")]
    pub store_key_prefix: String,

    // --- Places Provider Args ---
    /// API key for the places search provider.
    #[arg(long, env = "GOOGLE_PLACES_API_KEY")]
    pub places_api_key: Option<String>,

    /// Base URL of the places search provider.
    #[arg(long, env = "PLACES_BASE_URL", default_value = "https://maps.googleapis.com")]
    pub places_base_url: String,

    // --- SMS Provider Args ---
    /// Account SID for the SMS provider.
    #[arg(long, env = "TWILIO_ACCOUNT_SID")]
    pub twilio_account_sid: Option<String>,

    /// Auth token for the SMS provider.
    #[arg(long, env = "TWILIO_AUTH_TOKEN")]
    pub twilio_auth_token: Option<String>,

    /// Sender phone number used for outgoing SMS.
    #[arg(long, env = "TWILIO_PHONE_NUMBER")]
    pub twilio_phone_number: Option<String>,

    /// Base URL of the SMS provider.
    #[arg(long, env = "SMS_BASE_URL", default_value = "https://api.twilio.com")]
    pub sms_base_url: String,

    // --- Chat LLM Provider Args ---
    /// API Key for the Gemini text generation provider.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Model name for chat completion.
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// Base URL of the Gemini API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = "https://generativelanguage.googleapis.com")]
    pub gemini_base_url: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn places_key(&self) -> Option<String> {
        non_empty(&self.places_api_key)
    }

    pub fn gemini_key(&self) -> Option<String> {
        non_empty(&self.gemini_api_key)
    }

    /// SMS credentials as `(account_sid, auth_token, from_number)`, only when all three are set.
    pub fn twilio_credentials(&self) -> Option<(String, String, String)> {
        Some((
            non_empty(&self.twilio_account_sid)?,
            non_empty(&self.twilio_auth_token)?,
            non_empty(&self.twilio_phone_number)?,
        ))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const RELAY_VARS: &[&str] = &[
        "HOST",
        "PORT",
        "STORE_TYPE",
        "REQUEST_TIMEOUT",
        "ENABLE_TLS",
        "GOOGLE_PLACES_API_KEY",
        "TWILIO_ACCOUNT_SID",
        "TWILIO_AUTH_TOKEN",
        "TWILIO_PHONE_NUMBER",
    ];

    /// Parsing falls back to the process environment, so tests start from a clean slate.
    fn clear_relay_env() {
        for var in RELAY_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_match_documented_values() {
        clear_relay_env();
        let args = Args::parse_from(["lifeline-relay"]);
        assert_eq!(args.port, 5000);
        assert_eq!(args.store_type, "redis");
        assert_eq!(args.request_timeout, 10);
        assert!(!args.enable_tls);
    }

    #[test]
    #[serial]
    fn environment_overrides_defaults() {
        clear_relay_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("STORE_TYPE", "memory");
        let args = Args::parse_from(["lifeline-relay"]);
        clear_relay_env();

        assert_eq!(args.port, 8080);
        assert_eq!(args.store_type, "memory");
    }

    #[test]
    #[serial]
    fn empty_credentials_count_as_absent() {
        clear_relay_env();
        let args = Args::parse_from([
            "lifeline-relay",
            "--places-api-key",
            "",
            "--twilio-account-sid",
            "AC123",
            "--twilio-auth-token",
            "secret",
        ]);
        assert!(args.places_key().is_none());
        assert!(args.twilio_credentials().is_none());

        let args = Args::parse_from([
            "lifeline-relay",
            "--twilio-account-sid",
            "AC123",
            "--twilio-auth-token",
            "secret",
            "--twilio-phone-number",
            "+15550001111",
        ]);
        let (sid, _, from) = args.twilio_credentials().unwrap();
        assert_eq!(sid, "AC123");
        assert_eq!(from, "+15550001111");
    }
}
