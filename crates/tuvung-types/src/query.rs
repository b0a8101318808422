use serde::{Deserialize, Serialize};

/// A single lookup request.
///
/// `source_text` is Chinese text to annotate and translate, `target_text` is
/// Vietnamese text to resolve back into Chinese. Exactly one of them must be
/// populated; blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub source_text: Option<String>,
    #[serde(default)]
    pub target_text: Option<String>,
}

/// Which way a valid query resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction<'a> {
    /// Chinese in, Vietnamese out
    Forward(&'a str),
    /// Vietnamese in, Chinese out
    Reverse(&'a str),
}

impl Direction<'_> {
    pub fn text(&self) -> &str {
        match self {
            Direction::Forward(text) | Direction::Reverse(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("query has neither source text nor target text")]
    Empty,

    #[error("query has both source text and target text")]
    Ambiguous,
}

impl Query {
    pub fn source(text: impl Into<String>) -> Self {
        Self {
            source_text: Some(text.into()),
            target_text: None,
        }
    }

    pub fn target(text: impl Into<String>) -> Self {
        Self {
            source_text: None,
            target_text: Some(text.into()),
        }
    }

    /// Validate the one-field invariant and return the populated side, trimmed
    pub fn direction(&self) -> Result<Direction<'_>, InvalidQuery> {
        let source = non_blank(self.source_text.as_deref());
        let target = non_blank(self.target_text.as_deref());

        match (source, target) {
            (Some(text), None) => Ok(Direction::Forward(text)),
            (None, Some(text)) => Ok(Direction::Reverse(text)),
            (None, None) => Err(InvalidQuery::Empty),
            (Some(_), Some(_)) => Err(InvalidQuery::Ambiguous),
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
