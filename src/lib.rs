//! # pagechunk
//!
//! Structure-aware chunking of page-structured documents for retrieval
//! pipelines.
//!
//! Raw per-page layout primitives (text blocks, images, table grids) are
//! consolidated into ordered elements, serialized with placeholder tokens
//! for tables and images, split into size-bounded overlapping chunks and
//! mapped back to their page and intra-page offset.
//!
//! ## Quick Start
//!
//! ```
//! use pagechunk::{chunk_pages, RawBlock, RawPage, Rect};
//!
//! fn main() -> pagechunk::Result<()> {
//!     let page = RawPage::letter(1).with_block(RawBlock::text(
//!         0,
//!         Rect::new(72.0, 72.0, 540.0, 100.0),
//!         "Quarterly results were strong.\n\n",
//!     ));
//!
//!     let chunks = chunk_pages(&[page])?;
//!     assert_eq!(chunks[0].metadata.page_number, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Nested tables**: tables inside tables are flattened and deduplicated
//! - **Placeholder-aware sizing**: tables and images count at rendered size
//! - **Exact provenance**: every chunk knows its page and offset
//! - **Multi-scale**: one pass per (chunk_size, chunk_overlap) resolution
//! - **Parallel processing**: Uses Rayon for pages and resolutions

pub mod config;
pub mod consolidate;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod split;

// Re-export commonly used types
pub use config::ChunkConfig;
pub use consolidate::ElementConsolidator;
pub use error::{Error, Result};
pub use model::{
    Chunk, ChunkMetadata, Element, ElementKind, ElementValue, ImageData, Page, RawBlock, RawPage,
    RawPayload, RawTable, Rect, TableGrid,
};
pub use pipeline::{
    BatchAssembler, ChunkOptions, MultiScaleChunker, PlaceholderPolicy, ProvenanceResolver,
    Resolution, ResolveMode,
};
pub use render::{JsonFormat, TableFormat};
pub use split::{LengthMeasure, RecursiveSplitter, SplitterOptions};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Consolidate raw pages into ordered element lists.
///
/// Pages are processed in parallel; output order matches input order.
pub fn consolidate_pages(pages: &[RawPage]) -> Result<Vec<Page>> {
    ElementConsolidator::new().consolidate_all(pages)
}

/// Consolidate and chunk raw pages with default options.
///
/// Runs the three default resolutions (200/40, 400/80, 800/160) and returns
/// their chunks concatenated in that order.
pub fn chunk_pages(pages: &[RawPage]) -> Result<Vec<Chunk>> {
    chunk_pages_with_options(pages, ChunkOptions::default())
}

/// Consolidate and chunk raw pages with custom options.
///
/// # Example
///
/// ```
/// use pagechunk::{chunk_pages_with_options, ChunkOptions, RawBlock, RawPage, Rect};
///
/// let page = RawPage::letter(1).with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 10.0, 10.0), "a b c d e f"));
/// let options = ChunkOptions::new().with_chunk_size(5);
/// let chunks = chunk_pages_with_options(&[page], options).unwrap();
/// assert!(chunks.iter().all(|c| c.char_count() <= 5));
/// ```
pub fn chunk_pages_with_options(pages: &[RawPage], options: ChunkOptions) -> Result<Vec<Chunk>> {
    let consolidator = ElementConsolidator::new().with_parallel(options.parallel);
    let consolidated = consolidator.consolidate_all(pages)?;
    MultiScaleChunker::new(options)?.chunk(&consolidated)
}

/// Load raw pages from a JSON file.
///
/// The file holds an array of pages in the format `RawPage` serializes to.
pub fn load_pages<P: AsRef<Path>>(path: P) -> Result<Vec<RawPage>> {
    let path = path.as_ref();
    log::debug!("Loading pages from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Parse raw pages from a JSON string.
pub fn parse_pages(json: &str) -> Result<Vec<RawPage>> {
    Ok(serde_json::from_str(json)?)
}

/// Builder for consolidating and chunking documents.
///
/// # Example
///
/// ```
/// use pagechunk::{Chunker, RawBlock, RawPage, Rect, TableFormat};
///
/// let page = RawPage::letter(1).with_block(RawBlock::text(0, Rect::new(0.0, 0.0, 10.0, 10.0), "Hello\n"));
/// let chunks = Chunker::new()
///     .with_chunk_size(100)
///     .with_table_format(TableFormat::Html)
///     .strict()
///     .chunk(&[page])?;
/// assert_eq!(chunks.len(), 1);
/// # Ok::<(), pagechunk::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    options: ChunkOptions,
}

impl Chunker {
    /// Create a new Chunker builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Chunker configured from the environment.
    pub fn from_env() -> Result<Self> {
        let config = ChunkConfig::from_env()?;
        Ok(Self {
            options: ChunkOptions::from_config(&config)?,
        })
    }

    /// Use one resolution of `chunk_size` with an overlap of a fifth.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.options = self.options.with_chunk_size(chunk_size);
        self
    }

    /// Replace the resolution list.
    pub fn with_resolutions(mut self, resolutions: impl IntoIterator<Item = Resolution>) -> Self {
        self.options = self.options.with_resolutions(resolutions);
        self
    }

    /// Set table rendering.
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.options = self.options.with_table_format(format);
        self
    }

    /// Set the maximum number of pages per batch.
    pub fn with_summary_page_count(mut self, count: usize) -> Self {
        self.options = self.options.with_summary_page_count(count);
        self
    }

    /// Append separators to the splitting cascade.
    pub fn with_separators<S: Into<String>>(mut self, separators: impl IntoIterator<Item = S>) -> Self {
        self.options = self.options.with_separators(separators);
        self
    }

    /// Set the placeholder policy.
    pub fn with_placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.options = self.options.with_placeholder_policy(policy);
        self
    }

    /// Fail on placeholder tokens without a rendering.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Get the options this builder has accumulated.
    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Consolidate and chunk raw pages.
    pub fn chunk(&self, pages: &[RawPage]) -> Result<Vec<Chunk>> {
        chunk_pages_with_options(pages, self.options.clone())
    }

    /// Chunk pages that are already consolidated.
    pub fn chunk_consolidated(&self, pages: &[Page]) -> Result<Vec<Chunk>> {
        MultiScaleChunker::new(self.options.clone())?.chunk(pages)
    }

    /// Load raw pages from a JSON file and chunk them.
    pub fn chunk_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Chunk>> {
        let pages = load_pages(path)?;
        self.chunk(&pages)
    }
}
