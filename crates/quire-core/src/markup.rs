//! Markup segment data model.
//!
//! A markup line is parsed into a sequence of segments: whole words (or
//! word fragments where the tag state changes mid-word) and collapsed
//! whitespace, each paired with the tags open at that point.

use indexmap::IndexMap;

/// Open tags at a point in the source text, mapping tag name to parameters.
pub type TagMap = IndexMap<String, Vec<String>>;

/// One parsed line of markup.
pub type MarkupLine = Vec<MarkupSegment>;

/// Bold tag name.
pub const TAG_BOLD: &str = "b";
/// Italic tag name.
pub const TAG_ITALIC: &str = "i";
/// Underline tag name.
pub const TAG_UNDERLINE: &str = "u";
/// Color tag name.
pub const TAG_COLOR: &str = "c";
/// Font tag name.
pub const TAG_FONT: &str = "f";
/// Font size tag name.
pub const TAG_SIZE: &str = "s";
/// Reset tag name.
pub const TAG_RESET: &str = "r";

/// A word or collapsed whitespace with its open tags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkupSegment {
    /// The word text, or a single space for collapsed whitespace
    pub word: String,
    /// Tags open when this segment was encountered
    pub tags: TagMap,
}

impl MarkupSegment {
    /// Create a word segment with the given open tags.
    pub fn new(word: impl Into<String>, tags: TagMap) -> Self {
        Self {
            word: word.into(),
            tags,
        }
    }

    /// Create a word segment with no open tags.
    pub fn plain(word: impl Into<String>) -> Self {
        Self::new(word, TagMap::new())
    }

    /// Create a collapsed whitespace segment.
    pub fn space() -> Self {
        Self::plain(" ")
    }

    /// Whether this segment is collapsed whitespace.
    pub fn is_space(&self) -> bool {
        self.word == " " && self.tags.is_empty()
    }

    /// Whether the named tag is open for this segment.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// First parameter of the named tag, if the tag is open and has one.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.tags
            .get(name)
            .and_then(|params| params.first())
            .map(String::as_str)
    }

    /// Copy of this segment carrying different text.
    pub fn with_word(&self, word: impl Into<String>) -> Self {
        Self::new(word, self.tags.clone())
    }
}
