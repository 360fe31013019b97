pub mod gemini;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use super::LlmConfig;
use self::gemini::GeminiChatClient;
use crate::error::ApiResult;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> ApiResult<CompletionResponse>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, reqwest::Error> {
    Ok(Arc::new(GeminiChatClient::from_config(config)?))
}
