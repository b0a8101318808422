use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tuvung_types::VocabularyRecord;

/// Where accepted vocabulary ends up
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    async fn save(&self, record: &VocabularyRecord) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain-text vocabulary list, one `chinese (pinyin) : vietnamese` line per entry
#[derive(Debug, Clone)]
pub struct FileVocabularyStore {
    path: PathBuf,
}

impl FileVocabularyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry back; unparseable lines are skipped
    pub async fn load(&self) -> Result<Vec<VocabularyRecord>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        Ok(content.lines().filter_map(parse_line).collect())
    }
}

#[async_trait]
impl VocabularyStore for FileVocabularyStore {
    async fn save(&self, record: &VocabularyRecord) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(format_line(record).as_bytes()).await?;
        file.flush().await?;

        tracing::info!("Saved vocabulary: {}", record.source_text);
        Ok(())
    }
}

/// `chinese (pinyin) : vietnamese`. Without pinyin the parentheses are left
/// out, unless the Chinese itself ends in `)`: then an empty `()` keeps the
/// line from reading back with a pinyin.
fn format_line(record: &VocabularyRecord) -> String {
    let single_line = |text: &str| text.replace(['\n', '\r'], " ");
    let source = single_line(&record.source_text);

    match record.phonetic_transcription.as_deref() {
        Some(phonetic) => format!(
            "{} ({}) : {}\n",
            source,
            single_line(phonetic),
            single_line(&record.translated_text)
        ),
        None if source.trim_end().ends_with(')') => {
            format!("{} () : {}\n", source, single_line(&record.translated_text))
        }
        None => format!("{} : {}\n", source, single_line(&record.translated_text)),
    }
}

fn parse_line(line: &str) -> Option<VocabularyRecord> {
    let (head, translated) = line.split_once(" : ")?;
    let translated = translated.trim();

    let (source, phonetic) = match head.trim().strip_suffix(')') {
        Some(rest) => match rest.rsplit_once(" (") {
            Some((source, phonetic)) => (source.trim(), Some(phonetic.trim())),
            None => (head.trim(), None),
        },
        None => (head.trim(), None),
    };

    if source.is_empty() || translated.is_empty() {
        return None;
    }

    let record = VocabularyRecord::new(source, translated);
    Some(match phonetic.filter(|p| !p.is_empty()) {
        Some(phonetic) => record.with_phonetic(phonetic),
        None => record,
    })
}
