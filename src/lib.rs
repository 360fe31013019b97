pub mod alert;
pub mod cli;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod services;
pub mod store;

use cli::Args;
use llm::LlmConfig;
use llm::chat::new_client as new_chat_client;
use log::{ info, warn };
use server::Server;
use server::api::AppState;
use services::http_client;
use services::places::PlacesClient;
use services::sms::{ MessageSender, TwilioSender };
use std::error::Error;
use std::sync::Arc;

fn set_or_unset(value: bool) -> &'static str {
    if value { "set" } else { "unset" }
}

/// Builds the shared handler state. Fails if the record store cannot be reached.
pub async fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    let store = store::initialize_record_store(args).await?;

    let places = Arc::new(
        PlacesClient::new(
            http_client(args.request_timeout)?,
            args.places_base_url.clone(),
            args.places_key()
        )
    );

    let chat_config = LlmConfig {
        api_key: args.gemini_key(),
        completion_model: args.gemini_model.clone(),
        base_url: args.gemini_base_url.clone(),
        timeout_secs: args.request_timeout,
    };
    let chat = new_chat_client(&chat_config)?;
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        chat.get_model(),
        chat.get_base_url()
    );

    let sms = match args.twilio_credentials() {
        Some((account_sid, auth_token, from_number)) => {
            let sender: Arc<dyn MessageSender> = Arc::new(
                TwilioSender::new(
                    http_client(args.request_timeout)?,
                    args.sms_base_url.clone(),
                    account_sid,
                    auth_token,
                    from_number
                )
            );
            Some(sender)
        }
        None => {
            warn!("SMS credentials incomplete; SOS alerts will fail");
            None
        }
    };

    Ok(AppState { store, places, chat, sms })
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Listen Address: {}:{}", args.host, args.port);
    info!("Record Store Type: {}", args.store_type);
    info!("Record Store URL: {}", args.database_url);
    info!("CORS Origin: {}", args.cors_origin);
    info!("Outbound Timeout: {}s", args.request_timeout);
    info!("Places API Key: {}", set_or_unset(args.places_key().is_some()));
    info!("Gemini API Key: {}", set_or_unset(args.gemini_key().is_some()));
    info!("SMS Credentials: {}", set_or_unset(args.twilio_credentials().is_some()));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let state = build_state(&args).await?;
    let server = Server::new(state, args)?;
    server.run().await?;

    Ok(())
}
