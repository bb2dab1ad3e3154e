//! Output chunk types.

use serde::{Deserialize, Serialize};

/// A retrieval-ready piece of text with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text with placeholders expanded
    pub content: String,

    /// Where the chunk came from
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(content: impl Into<String>, page_number: u32, start_offset: usize) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata {
                page_number,
                start_offset,
            },
        }
    }

    /// Length of the content in chars.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Provenance of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Page the chunk starts on
    pub page_number: u32,

    /// Offset of the chunk start within that page's serialized text, in chars
    pub start_offset: usize,
}
