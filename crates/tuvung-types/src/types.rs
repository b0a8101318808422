use std::fmt;

use serde::{Deserialize, Serialize};

/// One vocabulary entry: a Chinese term, its pinyin and its Vietnamese meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    /// Chinese text
    pub source_text: String,
    /// Pinyin with tone marks, absent when the fallback provider answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_transcription: Option<String>,
    /// Vietnamese text
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
}

impl VocabularyRecord {
    pub fn new(source_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            phonetic_transcription: None,
            translated_text: translated_text.into(),
            example_sentence: None,
        }
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic_transcription = Some(phonetic.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_sentence = Some(example.into());
        self
    }
}

impl fmt::Display for VocabularyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.phonetic_transcription {
            Some(phonetic) => write!(
                f,
                "{} ({}) : {}",
                self.source_text, phonetic, self.translated_text
            ),
            None => write!(f, "{} : {}", self.source_text, self.translated_text),
        }
    }
}

/// Which provider produced a result.
///
/// Callers branch on this to know which record fields are trustworthy: only
/// the primary provider yields pinyin and example sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupMethod {
    PrimaryProvider,
    FallbackProvider,
}

impl LookupMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupMethod::PrimaryProvider => "AI (OpenAI)",
            LookupMethod::FallbackProvider => "Google Translate (fallback)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidQuery,
    MissingCredential,
    Unauthenticated,
    NetworkFailure,
    ProviderRejected,
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidQuery => "invalid query",
            ErrorKind::MissingCredential => "missing credential",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::ProviderRejected => "provider rejected the request",
            ErrorKind::MalformedResponse => "malformed response",
        };
        f.write_str(name)
    }
}

/// Terminal value of one lookup.
///
/// Exactly one of `record` and `error_kind` is set, matching `success`. The
/// fields are private so that only [`LookupResult::succeeded`] and
/// [`LookupResult::failed`] can build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    method_used: Option<LookupMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<VocabularyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl LookupResult {
    pub fn succeeded(method: LookupMethod, record: VocabularyRecord) -> Self {
        Self {
            success: true,
            method_used: Some(method),
            record: Some(record),
            error_kind: None,
            error_message: None,
        }
    }

    /// `method` names the last stage that ran, `None` when no provider was tried
    pub fn failed(method: Option<LookupMethod>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            method_used: method,
            record: None,
            error_kind: Some(kind),
            error_message: Some(message.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn method_used(&self) -> Option<LookupMethod> {
        self.method_used
    }

    pub fn record(&self) -> Option<&VocabularyRecord> {
        self.record.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn into_record(self) -> Option<VocabularyRecord> {
        self.record
    }
}
