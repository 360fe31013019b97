use crate::alert::send_alert;
use crate::error::{ ApiError, ApiResult };
use crate::llm::chat::ChatClient;
use crate::llm::prompt::build_chat_prompt;
use crate::models::chat::{ ChatReply, ChatRequest };
use crate::models::first_aid::FirstAidEntry;
use crate::models::profile::{ AlertRequest, EmergencyProfile, ProfileSubmission };
use crate::services::places::{ Coordinates, PlacesClient };
use crate::services::sms::MessageSender;
use crate::store::RecordStore;
use std::error::Error;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ rejection::JsonRejection, Path, Query, State },
    http::{ header, HeaderValue, Method },
};
use serde::{ Deserialize, Serialize };
use serde_json::Value as JsonValue;
use tower_http::cors::CorsLayer;
use log::{ info, warn };

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct AlertResponse {
    pub message: String,
    pub delivered: usize,
    pub failed: usize,
}

/// Provider clients and the record store, built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub places: Arc<PlacesClient>,
    pub chat: Arc<dyn ChatClient>,
    /// `None` when SMS credentials are not configured.
    pub sms: Option<Arc<dyn MessageSender>>,
}

pub fn router(state: AppState, cors_origin: &str) -> Result<Router, Box<dyn Error + Send + Sync>> {
    let origin = HeaderValue::from_str(cors_origin)
        .map_err(|e| format!("Invalid CORS origin '{}': {}", cors_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(routes().layer(cors).with_state(state))
}

/// The API routes without the CORS layer.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/nearby-hospitals", get(nearby_hospitals_handler))
        .route("/api/first-aid", get(first_aid_handler))
        .route("/api/sos", post(submit_profile_handler))
        .route("/api/sos/alert", post(sos_alert_handler))
        .route("/api/sos/{user_id}", get(get_profile_handler))
        .route("/api/chat", post(chat_handler))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::InvalidArgument(rejection.body_text()))
}

async fn health_handler() -> Json<JsonValue> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn nearby_hospitals_handler(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>
) -> ApiResult<Json<JsonValue>> {
    let coords = Coordinates::parse(query.lat.as_deref(), query.lng.as_deref())?;
    let payload = state.places.nearby_hospitals(coords).await?;
    Ok(Json(payload))
}

async fn first_aid_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<FirstAidEntry>>> {
    let entries = state.store.list_first_aid().await?;
    Ok(Json(entries))
}

async fn submit_profile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProfileSubmission>, JsonRejection>
) -> ApiResult<Json<MessageResponse>> {
    let submission = json_body(payload)?;
    let user_id = submission
        .user_id()
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidArgument("userId is required".into()))?;

    let upserted = state.store.upsert_profile(&user_id, submission).await?;
    let message = if upserted.created {
        info!("Created SOS profile for {}", user_id);
        "Profile created successfully"
    } else {
        info!("Updated SOS profile for {}", user_id);
        "Profile updated successfully"
    };
    Ok(Json(MessageResponse { message: message.into() }))
}

async fn get_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>
) -> ApiResult<Json<EmergencyProfile>> {
    state.store
        .get_profile(&user_id).await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))
}

async fn sos_alert_handler(
    State(state): State<AppState>,
    payload: Result<Json<AlertRequest>, JsonRejection>
) -> ApiResult<Json<AlertResponse>> {
    let request = json_body(payload)?;
    let user_id = request.user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("userId is required".into()))?;

    let report = send_alert(state.store.as_ref(), state.sms.clone(), user_id).await?;
    if report.failed() > 0 {
        warn!(
            "SOS alert for {} reached {} of {} contact(s)",
            user_id,
            report.delivered(),
            report.outcomes.len()
        );
    }
    Ok(
        Json(AlertResponse {
            message: "SOS alert sent to emergency contacts".into(),
            delivered: report.delivered(),
            failed: report.failed(),
        })
    )
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> ApiResult<Json<ChatReply>> {
    let request = json_body(payload)?;
    let message = request.message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("Message is required".into()))?;

    let prompt = build_chat_prompt(&request.chat_history, message);
    let completion = state.chat.complete(&prompt).await?;
    Ok(Json(ChatReply { reply: completion.response }))
}
