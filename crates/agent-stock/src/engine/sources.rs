//! Grounding sources and cross-task deduplication

use agent_llm::GroundingChunk;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A web page an analyst's answer was grounded on
///
/// Identity is the `uri`; the title is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

impl GroundingSource {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }

    /// Convert a provider chunk, dropping it unless both fields are non-empty
    pub fn from_chunk(chunk: &GroundingChunk) -> Option<Self> {
        if !chunk.is_complete() {
            return None;
        }
        Some(Self::new(chunk.uri.clone()?, chunk.title.clone()?))
    }
}

/// Keep the first source for each `uri`, preserving order
pub fn dedupe(sources: impl IntoIterator<Item = GroundingSource>) -> Vec<GroundingSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}
