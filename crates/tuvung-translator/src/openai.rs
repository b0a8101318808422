use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tuvung_config::openai::OpenAiConfig;
use tuvung_types::Query;

use crate::prompt::{LOOKUP_SYSTEM_PROMPT, lookup_prompt};
use crate::{
    ProviderClient, ProviderError, ProviderMetadata, RawResponse, ResponseShape,
    build_http_client, error_from_response,
};

const PROVIDER_NAME: &str = "openai";

/// Chat-completion backend, the part of [`OpenAiClient`] the tutor needs
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send one chat request and return the first choice's message
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Answer to the tool call `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: vec![],
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: vec![],
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as sent by the model
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: default_tool_type(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

fn default_tool_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI chat-completion client, the primary lookup provider
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Fails with [`ProviderError::MissingCredential`] when no api key is configured
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if !config.has_credential() {
            return Err(ProviderError::MissingCredential(PROVIDER_NAME.to_string()));
        }

        let client = build_http_client(config.timeout_secs)?;
        tracing::info!("OpenAI client initialized (model={})", config.model);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }

    /// Chat request for a vocabulary lookup
    pub fn lookup_request(&self, query: &Query) -> Result<ChatRequest, ProviderError> {
        let direction = query.direction()?;

        Ok(ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(LOOKUP_SYSTEM_PROMPT),
                ChatMessage::user(lookup_prompt(direction)),
            ],
            temperature: self.config.temperature,
            max_tokens: Some(self.config.max_tokens),
            tools: vec![],
            tool_choice: None,
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ProviderError::Malformed("No choices in response".to_string()))
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    async fn call(&self, query: &Query) -> Result<RawResponse, ProviderError> {
        let request = self.lookup_request(query)?;
        let message = self.complete(&request).await?;
        let text = message.content.unwrap_or_default();

        tracing::debug!("OpenAI returned {} chars", text.len());
        Ok(RawResponse::new(PROVIDER_NAME, text.trim()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI".to_string(),
            requires_api_key: true,
            shape: ResponseShape::Rich,
        }
    }
}
