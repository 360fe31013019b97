use async_trait::async_trait;
use log::{ info, warn };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, CompletionResponse };
use crate::error::{ ApiError, ApiResult };
use crate::llm::LlmConfig;
use crate::services::http_client;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: GoogleContent,
}

#[derive(Deserialize)]
struct GoogleContent {
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiChatClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        http: reqwest::Client,
        api_key: Option<String>,
        model: String,
        base_url: String
    ) -> Self {
        if api_key.is_none() {
            warn!("Gemini API key not configured; chat will fail");
        }
        Self { http, api_key, model, base_url }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        Ok(
            Self::new(
                http_client(config.timeout_secs)?,
                config.api_key.clone(),
                config.completion_model.clone(),
                config.base_url.clone()
            )
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(&self, prompt: &str) -> ApiResult<CompletionResponse> {
        let api_key = self.api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("Gemini API key is not configured".into()))?;

        info!("GeminiChatClient::complete() → model={} base_url={}", self.model, self.base_url);

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let payload = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
        };

        let resp = self.http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send().await
            .map_err(|e| ApiError::Internal(format!("Gemini request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Internal(format!("Gemini answered {}", status)));
        }

        let body = resp
            .json::<GoogleResponse>().await
            .map_err(|e| ApiError::Internal(format!("Malformed Gemini response: {}", e)))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| CompletionResponse { response: p.text })
            .ok_or_else(|| ApiError::Internal("Gemini returned no candidates".into()))
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
