//! Feed queries: curated listing or free-text search.

use serde::{Deserialize, Serialize};

/// Whether a feed lists curated content or searches by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryMode {
    Curated,
    Search,
}

/// Normalized feed query.
///
/// Only constructible through normalizing constructors, deserialization
/// included, so derived equality compares mode and trimmed text. A search for
/// blank text is a curated query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawQuery")]
pub struct Query {
    mode: QueryMode,
    text: String,
}

/// Query as stored, before normalization.
#[derive(Deserialize)]
struct RawQuery {
    mode: QueryMode,
    #[serde(default)]
    text: String,
}

impl From<RawQuery> for Query {
    fn from(raw: RawQuery) -> Self {
        Query::new(raw.mode, raw.text)
    }
}

impl Query {
    /// Query listing curated content.
    pub fn curated() -> Self {
        Self {
            mode: QueryMode::Curated,
            text: String::new(),
        }
    }

    /// Search query; blank text degrades to [`Query::curated`].
    pub fn search(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            Self::curated()
        } else {
            Self {
                mode: QueryMode::Search,
                text: trimmed.to_string(),
            }
        }
    }

    /// Builds a query from an explicit mode and raw text.
    ///
    /// Text is ignored for curated queries.
    pub fn new(mode: QueryMode, text: impl AsRef<str>) -> Self {
        match mode {
            QueryMode::Curated => Self::curated(),
            QueryMode::Search => Self::search(text),
        }
    }

    /// Query for what the user typed into a search box.
    pub fn from_text(text: impl AsRef<str>) -> Self {
        Self::search(text)
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Trimmed search text, empty for curated queries.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_search(&self) -> bool {
        self.mode == QueryMode::Search
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::curated()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            QueryMode::Curated => write!(f, "curated"),
            QueryMode::Search => write!(f, "search '{}'", self.text),
        }
    }
}
