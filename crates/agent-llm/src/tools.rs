//! Built-in provider tools and the grounding metadata they produce

use serde::{Deserialize, Serialize};

/// A provider-side tool the model may use while answering
///
/// These are not client-executed function calls: the provider runs them and
/// reports what it used through [`GroundingChunk`]s on the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Live web search; answers come back with citation chunks
    GoogleSearch,
}

/// One citation attached to a grounded answer
///
/// Either field may be missing on the wire; callers decide what an
/// incomplete chunk means for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web URI of the cited page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Title of the cited page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingChunk {
    /// Create a web chunk with both fields set
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: Some(title.into()),
        }
    }

    /// Both `uri` and `title` are present and non-empty
    pub fn is_complete(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.uri) && filled(&self.title)
    }
}
