use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "tu_vung_trung_viet.txt".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Vocabulary file, one entry per line
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
        }
    }
}
