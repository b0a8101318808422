use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

/// Overrides for the chat tutor; credentials come from [`crate::openai::OpenAiConfig`]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TutorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}
