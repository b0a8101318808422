use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tuvung_config::Config;
use tuvung_config::tutor::TutorConfig;
use tuvung_translator::openai::{ChatMessage, ChatRequest, ToolCall, ToolDefinition};
use tuvung_translator::{ChatCompletion, OpenAiClient, ProviderError};
use tuvung_types::VocabularyRecord;

use crate::store::VocabularyStore;

pub const TUTOR_SYSTEM_PROMPT: &str = "You are a professional Chinese-Vietnamese bilingual tutor.
1. If the input is Chinese: show Pinyin -> translate to Vietnamese -> save the new words.
2. If the input is Vietnamese: translate to Chinese -> show Pinyin -> save the new Chinese words.
Always prefer calling the 'save_vocabulary' function to save vocabulary.";

const SAVE_VOCABULARY: &str = "save_vocabulary";

const NO_RESULT: &str = "No result";

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("Empty message")]
    EmptyMessage,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Deserialize)]
struct SaveVocabularyArgs {
    chinese: String,
    #[serde(default)]
    pinyin: String,
    vietnamese: String,
}

/// Free-form bilingual tutoring chat that saves new words through a tool call
pub struct Tutor {
    chat: Arc<dyn ChatCompletion>,
    store: Arc<dyn VocabularyStore>,
    config: TutorConfig,
    temperature: f32,
}

impl Tutor {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        store: Arc<dyn VocabularyStore>,
        config: TutorConfig,
        temperature: f32,
    ) -> Self {
        Self {
            chat,
            store,
            config,
            temperature,
        }
    }

    /// Tutor backed by OpenAI; fails without an api key
    pub fn from_config(
        config: &Config,
        store: Arc<dyn VocabularyStore>,
    ) -> Result<Self, ProviderError> {
        let client = OpenAiClient::new(config.openai.clone())?;
        Ok(Self::new(
            Arc::new(client),
            store,
            config.tutor.clone(),
            config.openai.temperature,
        ))
    }

    /// Answer one message. Tool calls are executed and their results sent
    /// back for a second, final completion.
    pub async fn reply(&self, message: &str) -> Result<String, TutorError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        tracing::info!("Tutor message: {message}");
        let mut messages = vec![
            ChatMessage::system(TUTOR_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ];

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.clone(),
            temperature: self.temperature,
            max_tokens: Some(self.config.max_tokens),
            tools: vec![save_vocabulary_tool()],
            tool_choice: Some("auto".to_string()),
        };
        let first = self.chat.complete(&request).await?;

        if first.tool_calls.is_empty() {
            tracing::info!("Tutor answered directly");
            return Ok(content_or_placeholder(first));
        }

        let tool_calls = first.tool_calls.clone();
        messages.push(first);

        for call in &tool_calls {
            let outcome = self.run_tool(call).await;
            messages.push(ChatMessage::tool(&call.id, outcome));
        }

        let summary_request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: None,
            tools: vec![],
            tool_choice: None,
        };
        let summary = self.chat.complete(&summary_request).await?;

        tracing::info!("Tutor completed after {} tool call(s)", tool_calls.len());
        Ok(content_or_placeholder(summary))
    }

    async fn run_tool(&self, call: &ToolCall) -> String {
        if call.function.name != SAVE_VOCABULARY {
            return format!("Unknown function: {}", call.function.name);
        }

        let args: SaveVocabularyArgs = match serde_json::from_str(&call.function.arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::error!("Tool execution error: {e}");
                return format!("Error: {e}");
            }
        };

        let (chinese, vietnamese) = (args.chinese.trim(), args.vietnamese.trim());
        if chinese.is_empty() || vietnamese.is_empty() {
            tracing::warn!("Refusing to save vocabulary with blank fields");
            return "Error: chinese and vietnamese must not be empty".to_string();
        }

        let mut record = VocabularyRecord::new(chinese, vietnamese);
        if !args.pinyin.trim().is_empty() {
            record = record.with_phonetic(args.pinyin.trim());
        }

        match self.store.save(&record).await {
            Ok(()) => format!("Saved: {record}"),
            Err(e) => {
                tracing::error!("Failed to save vocabulary: {e}");
                format!("Error writing file: {e}")
            }
        }
    }
}

fn content_or_placeholder(message: ChatMessage) -> String {
    message
        .content
        .filter(|content| !content.trim().is_empty())
        .unwrap_or_else(|| NO_RESULT.to_string())
}

fn save_vocabulary_tool() -> ToolDefinition {
    ToolDefinition::function(
        SAVE_VOCABULARY,
        "Save a Chinese word with its Pinyin and Vietnamese meaning.",
        json!({
            "type": "object",
            "properties": {
                "chinese": { "type": "string", "description": "Chinese word" },
                "pinyin": { "type": "string", "description": "Pinyin transcription" },
                "vietnamese": { "type": "string", "description": "Vietnamese meaning" }
            },
            "required": ["chinese", "pinyin", "vietnamese"]
        }),
    )
}
