use crate::ai::{CompletionProvider, Message, build_messages};
use crate::config::{Config, DEFAULT_ENDPOINT, DEFAULT_MODEL_ID};
use crate::error::ProviderError;
use crate::group_chat::Turn;
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAICompletionRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Message> for OpenAIMessage {
    fn from(m: Message) -> Self {
        OpenAIMessage {
            role: m.role.to_string(),
            content: m.content,
            name: m.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAICompletionResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: Option<&str>,
        endpoint: Option<&str>,
        model: Option<&str>,
        max_tokens: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let endpoint_url = endpoint
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // Only add auth header if API key is provided and not empty
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ProviderError::Client(format!("Invalid API key format: {}", e)))?;
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        let model_name = match model {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => DEFAULT_MODEL_ID.to_string(),
        };

        Ok(Self {
            client,
            endpoint: endpoint_url,
            model: model_name,
            max_tokens,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.openai_api_key.as_deref(),
            Some(&config.endpoint),
            Some(&config.model_id),
            config.max_tokens,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate_text(&self, messages: Vec<Message>) -> Result<String, ProviderError> {
        let request = self.build_request(messages);

        log::info!(
            "[OPENAI] Sending request to {} with model {} ({} messages)",
            self.endpoint,
            self.model,
            request.messages.len()
        );
        log::debug!(
            "[OPENAI] Full request:\n{}",
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read OpenAI response: {}", e)))?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &response_text));
        }

        log::debug!("[OPENAI] Raw response:\n{}", response_text);

        parse_completion(&response_text)
    }

    fn build_request(&self, messages: Vec<Message>) -> OpenAICompletionRequest {
        OpenAICompletionRequest {
            model: self.model.clone(),
            messages: messages.into_iter().map(OpenAIMessage::from).collect(),
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIClient {
    async fn complete(
        &self,
        role_prompt: &str,
        context: &[Turn],
        speaker: &str,
    ) -> Result<String, ProviderError> {
        self.generate_text(build_messages(role_prompt, context, speaker))
            .await
    }
}

/// Map a non-success status and body to a provider error
fn classify_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<OpenAIErrorResponse>(body)
        .map(|r| r.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => ProviderError::Auth(message),
        429 => ProviderError::RateLimit(message),
        _ => ProviderError::Api { status, message },
    }
}

/// Extract the first choice's text. Missing content yields an empty string.
fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let response_data: OpenAICompletionResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::MalformedResponse(format!("{} - body: {}", e, body))
    })?;

    let choice = response_data.choices.into_iter().next().ok_or_else(|| {
        ProviderError::MalformedResponse("OpenAI API returned no choices".to_string())
    })?;

    let content = choice.message.content.unwrap_or_default();
    log::info!(
        "[OPENAI] Response - content_len: {}, finish_reason: {:?}",
        content.len(),
        choice.finish_reason
    );

    Ok(content)
}
