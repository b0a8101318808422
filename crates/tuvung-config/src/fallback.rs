use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_chinese_code() -> String {
    "zh-CN".to_string()
}

fn default_vietnamese_code() -> String {
    "vi".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Google-Translate-compatible fallback provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FallbackConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Sent as `key` when set
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_chinese_code")]
    pub chinese_code: String,
    #[serde(default = "default_vietnamese_code")]
    pub vietnamese_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            api_key: None,
            chinese_code: default_chinese_code(),
            vietnamese_code: default_vietnamese_code(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
