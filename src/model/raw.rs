//! Raw layout primitives supplied by a page extractor.

use serde::{Deserialize, Serialize};

use super::{Rect, TableGrid};

/// One page as delivered by the page extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Layout blocks in document order
    #[serde(default)]
    pub blocks: Vec<RawBlock>,

    /// Detected table regions, in no particular order
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

impl RawPage {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Append a block.
    pub fn add_block(&mut self, block: RawBlock) {
        self.blocks.push(block);
    }

    /// Append a table.
    pub fn add_table(&mut self, table: RawTable) {
        self.tables.push(table);
    }

    /// Builder form of [`RawPage::add_block`].
    pub fn with_block(mut self, block: RawBlock) -> Self {
        self.add_block(block);
        self
    }

    /// Builder form of [`RawPage::add_table`].
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.add_table(table);
        self
    }
}

/// A layout block: either a run of text or an embedded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    /// Block number assigned by the extractor
    pub order: u32,

    /// Bounding box on the page
    pub bbox: Rect,

    /// Block content
    pub payload: RawPayload,
}

impl RawBlock {
    /// Create a text block.
    pub fn text(order: u32, bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            order,
            bbox,
            payload: RawPayload::Text { text: text.into() },
        }
    }

    /// Create an image block.
    pub fn image(order: u32, bbox: Rect, data: Vec<u8>) -> Self {
        Self {
            order,
            bbox,
            payload: RawPayload::Image { data },
        }
    }

    /// Create a text block from lines of spans.
    ///
    /// Spans on a line are concatenated, every line ends with `\n`, and the
    /// block ends with one more `\n` so consecutive blocks are separated by
    /// a blank line.
    pub fn from_lines<L, S>(order: u32, bbox: Rect, lines: impl IntoIterator<Item = L>) -> Self
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            for span in line {
                text.push_str(span.as_ref());
            }
            text.push('\n');
        }
        text.push('\n');
        Self::text(order, bbox, text)
    }

    /// Check if this block carries text.
    pub fn is_text(&self) -> bool {
        matches!(self.payload, RawPayload::Text { .. })
    }

    /// Check if this block carries an image.
    pub fn is_image(&self) -> bool {
        matches!(self.payload, RawPayload::Image { .. })
    }
}

/// Content of a raw block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawPayload {
    /// Text content
    Text {
        /// Block text, lines separated by `\n`
        text: String,
    },

    /// Encoded image bytes (base64 in JSON)
    Image {
        /// Raw image payload
        #[serde(with = "super::base64_bytes")]
        data: Vec<u8>,
    },
}

/// A detected table region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    /// Bounding box on the page
    pub bbox: Rect,

    /// Extracted cell grid
    pub grid: TableGrid,
}

impl RawTable {
    /// Create a new table region.
    pub fn new(bbox: Rect, grid: TableGrid) -> Self {
        Self { bbox, grid }
    }
}
