use crate::attributes::PlayerAttributes;
use crate::error::PlanError;
use crate::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::responses::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use configuration::PlanGeneratorConfig;
use reqwest::Client;
use std::time::Duration;

/// Turns player attributes into a written plan.
///
/// The HTTP layer holds a `dyn PlanGenerator`, so a stub can stand in for the
/// hosted model in tests.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, attributes: &PlayerAttributes) -> Result<String, PlanError>;
}

/// A client for any OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct OpenAiPlanGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiPlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiPlanGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiPlanGenerator {
    /// Builds a generator, reading the API key from the configured environment variable.
    pub fn from_env(config: &PlanGeneratorConfig) -> Result<Self, PlanError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PlanError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &PlanGeneratorConfig, api_key: String) -> Result<Self, PlanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlanGenerator for OpenAiPlanGenerator {
    #[tracing::instrument(name = "generate_plan", skip_all, fields(model = %self.model))]
    async fn generate(&self, attributes: &PlayerAttributes) -> Result<String, PlanError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(attributes)),
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "Chat completion returned."
        );
        parse_completion(status.as_u16(), &text)
    }
}

/// Extracts the plan text from a chat completion body.
pub fn parse_completion(status: u16, body: &str) -> Result<String, PlanError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(PlanError::Api { status, message });
    }

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| PlanError::Deserialization(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(PlanError::EmptyResponse)
}
