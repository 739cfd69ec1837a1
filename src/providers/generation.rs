use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::RagError;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// single non-streaming completion from a system instruction and user prompt
    async fn complete(&self, system: &str, user: &str) -> Result<String, RagError>;
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, RagError> {
        if api_key.trim().is_empty() {
            return Err(RagError::Generation("OPENAI_API_KEY is not set".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl GenerationClient for OpenAiChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, RagError> {
        let url = format!("{}/chat/completions", OPENAI_API_BASE);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "stream": false,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!(
                "OpenAI chat error ({}): {}",
                status, text
            )));
        }

        let payload: ChatCompletionResponse = res.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RagError::Generation("chat response contained no content".to_string()))
    }
}
