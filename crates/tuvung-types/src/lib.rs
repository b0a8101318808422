pub mod query;
pub mod types;

pub use query::{Direction, InvalidQuery, Query};
pub use types::{ErrorKind, LookupMethod, LookupResult, VocabularyRecord};
