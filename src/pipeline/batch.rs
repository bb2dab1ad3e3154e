//! Page batching and serialization with placeholder tokens.

use super::placeholder::{placeholder_token, PlaceholderRegistry};
use crate::error::{Error, Result};
use crate::model::{ElementValue, Page};
use crate::render::{render_image, TableFormat};

/// Default number of pages serialized into one batch.
pub const DEFAULT_SUMMARY_PAGE_COUNT: usize = 100;

/// Char range `[start, end)` a page occupies in its batch text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// Page number
    pub page_number: u32,
    /// First char of the page
    pub start: usize,
    /// One past the last char of the page
    pub end: usize,
}

impl PageRange {
    /// Whether `offset` falls inside this page.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Length of the page text in chars.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the page contributed no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A run of pages serialized into one string.
#[derive(Debug, Clone)]
pub struct DocumentBatch<'a> {
    pages: &'a [Page],
    text: String,
    ranges: Vec<PageRange>,
    registry: PlaceholderRegistry,
}

impl<'a> DocumentBatch<'a> {
    /// Pages in this batch.
    pub fn pages(&self) -> &'a [Page] {
        self.pages
    }

    /// Serialized text, with tables and images as placeholder tokens.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Per-page char ranges, in page order.
    pub fn page_ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    /// Placeholder renderings for this batch.
    pub fn registry(&self) -> &PlaceholderRegistry {
        &self.registry
    }

    /// Mutable access to the registry, used while resolving chunks.
    pub fn registry_mut(&mut self) -> &mut PlaceholderRegistry {
        &mut self.registry
    }

    /// Find the page range containing a batch offset.
    pub fn page_at(&self, offset: usize) -> Option<&PageRange> {
        self.ranges.iter().find(|r| r.contains(offset))
    }
}

/// Groups pages into batches and serializes each batch.
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    /// Rendering used for table placeholders
    pub table_format: TableFormat,
    /// Maximum number of pages per batch
    pub summary_page_count: usize,
}

impl BatchAssembler {
    /// Create an assembler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table rendering.
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.table_format = format;
        self
    }

    /// Set the maximum number of pages per batch.
    pub fn with_summary_page_count(mut self, count: usize) -> Self {
        self.summary_page_count = count;
        self
    }

    /// Split `pages` into batches of at most `summary_page_count` pages.
    pub fn assemble<'a>(&self, pages: &'a [Page]) -> Result<Vec<DocumentBatch<'a>>> {
        if self.summary_page_count == 0 {
            return Err(Error::config("summary_page_count must be positive"));
        }

        let batches: Vec<_> = pages
            .chunks(self.summary_page_count)
            .map(|run| self.assemble_batch(run))
            .collect();

        log::debug!(
            "Assembled {} pages into {} batch(es)",
            pages.len(),
            batches.len()
        );
        Ok(batches)
    }

    /// Serialize one run of pages.
    pub fn assemble_batch<'a>(&self, pages: &'a [Page]) -> DocumentBatch<'a> {
        let mut text = String::new();
        let mut ranges = Vec::with_capacity(pages.len());
        let mut registry = PlaceholderRegistry::new();
        let mut offset = 0;

        for page in pages {
            let start = offset;
            for element in &page.elements {
                let piece = match &element.value {
                    ElementValue::Text(value) => value.clone(),
                    ElementValue::Table(grid) => {
                        let token = placeholder_token(page.number, element.number, element.kind());
                        registry.register_at(token.clone(), offset, self.table_format.render(grid));
                        token
                    }
                    ElementValue::Image(image) => {
                        let token = placeholder_token(page.number, element.number, element.kind());
                        registry.register_at(token.clone(), offset, render_image(image));
                        token
                    }
                };
                offset += piece.chars().count();
                text.push_str(&piece);
            }
            ranges.push(PageRange {
                page_number: page.number,
                start,
                end: offset,
            });
        }

        DocumentBatch {
            pages,
            text,
            ranges,
            registry,
        }
    }
}

impl Default for BatchAssembler {
    fn default() -> Self {
        Self {
            table_format: TableFormat::default(),
            summary_page_count: DEFAULT_SUMMARY_PAGE_COUNT,
        }
    }
}
