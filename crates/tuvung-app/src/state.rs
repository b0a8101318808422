use std::path::Path;
use std::sync::Arc;

use tuvung_config::Config;
use tuvung_core::{FileVocabularyStore, LookupPipeline};

pub struct AppState {
    pub config: Config,
    pub pipeline: LookupPipeline,
    pub store: Arc<FileVocabularyStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let pipeline = LookupPipeline::from_config(&config);
        let store = Arc::new(FileVocabularyStore::new(&config.store.path));

        if !pipeline.has_primary() && !pipeline.has_fallback() {
            tracing::warn!("No lookup provider configured, every lookup will fail");
        }

        Self {
            config,
            pipeline,
            store,
        }
    }
}

/// Config file if given, then environment variables on top
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            let mut config = Config::load(path)?;
            config.apply_vars(|key| std::env::var(key).ok());
            config
        }
        None => Config::from_env(),
    };

    Ok(config)
}
