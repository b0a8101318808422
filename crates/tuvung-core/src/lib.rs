pub mod parser;
pub mod pipeline;
pub mod retry;
pub mod store;
pub mod tutor;

pub use pipeline::{LookupPipeline, LookupPipelineBuilder};
pub use retry::{RetryDecision, RetryPolicy};
pub use store::{FileVocabularyStore, StoreError, VocabularyStore};
pub use tutor::{Tutor, TutorError};

#[cfg(test)]
mod tests;
