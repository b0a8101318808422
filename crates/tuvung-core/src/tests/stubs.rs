use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tuvung_translator::openai::{ChatMessage, ChatRequest};
use tuvung_translator::{
    ChatCompletion, ProviderClient, ProviderError, ProviderMetadata, RawResponse, ResponseShape,
};
use tuvung_types::{Query, VocabularyRecord};

use crate::store::{StoreError, VocabularyStore};

/// Provider that replays a script; the last entry repeats forever
pub struct StubProvider {
    name: &'static str,
    shape: ResponseShape,
    script: Vec<Result<String, ProviderError>>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn primary(script: Vec<Result<String, ProviderError>>) -> Self {
        Self::new("stub-primary", ResponseShape::Rich, script)
    }

    pub fn fallback(script: Vec<Result<String, ProviderError>>) -> Self {
        Self::new("stub-fallback", ResponseShape::TranslationOnly, script)
    }

    pub fn always(shape: ResponseShape, response: Result<String, ProviderError>) -> Self {
        let name = match shape {
            ResponseShape::Rich => "stub-primary",
            ResponseShape::TranslationOnly => "stub-fallback",
        };
        Self::new(name, shape, vec![response])
    }

    fn new(
        name: &'static str,
        shape: ResponseShape,
        script: Vec<Result<String, ProviderError>>,
    ) -> Self {
        assert!(!script.is_empty(), "stub needs at least one response");
        Self {
            name,
            shape,
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for StubProvider {
    async fn call(&self, _query: &Query) -> Result<RawResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = &self.script[n.min(self.script.len() - 1)];
        step.clone().map(|text| RawResponse::new(self.name, text))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: self.name.to_string(),
            requires_api_key: false,
            shape: self.shape,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<VocabularyRecord>>,
    pub fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<VocabularyRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl VocabularyStore for MemoryStore {
    async fn save(&self, record: &VocabularyRecord) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Chat backend that replays messages and keeps every request it saw
pub struct StubChat {
    replies: Mutex<Vec<Result<ChatMessage, ProviderError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl StubChat {
    pub fn new(replies: Vec<Result<ChatMessage, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for StubChat {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ProviderError::Malformed("no scripted reply".to_string())))
    }
}
