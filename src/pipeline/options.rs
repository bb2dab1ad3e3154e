//! Options for the chunking pipeline.

use std::sync::Arc;

use super::batch::DEFAULT_SUMMARY_PAGE_COUNT;
use super::placeholder::PlaceholderPolicy;
use super::provenance::ResolveMode;
use crate::config::ChunkConfig;
use crate::error::Result;
use crate::render::TableFormat;
use crate::split::{LengthMeasure, SplitterOptions};

/// One (chunk_size, chunk_overlap) pass over the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Maximum chunk length
    pub chunk_size: usize,
    /// Length carried over between consecutive chunks
    pub chunk_overlap: usize,
}

impl Resolution {
    /// Create a resolution.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Resolution for a caller-chosen size, overlapping by a fifth of it.
    pub fn from_chunk_size(chunk_size: usize) -> Self {
        Self::new(chunk_size, chunk_size / 5)
    }
}

/// Resolutions used when none are configured.
pub const DEFAULT_RESOLUTIONS: [Resolution; 3] = [
    Resolution {
        chunk_size: 200,
        chunk_overlap: 40,
    },
    Resolution {
        chunk_size: 400,
        chunk_overlap: 80,
    },
    Resolution {
        chunk_size: 800,
        chunk_overlap: 160,
    },
];

/// Options for [`MultiScaleChunker`](super::MultiScaleChunker).
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Passes to run, in output order
    pub resolutions: Vec<Resolution>,

    /// Rendering of tables substituted into chunks
    pub table_format: TableFormat,

    /// Maximum number of pages per batch
    pub summary_page_count: usize,

    /// Splitter template; chunk size and overlap are set per resolution
    pub splitter: SplitterOptions,

    /// Handling of unregistered placeholder tokens
    pub resolve_mode: ResolveMode,

    /// Lifetime of placeholder registry entries
    pub placeholder_policy: PlaceholderPolicy,

    /// Run resolutions in parallel
    pub parallel: bool,
}

impl ChunkOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a validated [`ChunkConfig`].
    pub fn from_config(config: &ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            resolutions: config.resolutions(),
            table_format: config.table_format,
            summary_page_count: config.summary_page_count,
            ..Self::default()
        })
    }

    /// Use a single resolution of `chunk_size`, overlapping by a fifth.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.resolutions = vec![Resolution::from_chunk_size(chunk_size)];
        self
    }

    /// Replace the resolution list.
    pub fn with_resolutions(mut self, resolutions: impl IntoIterator<Item = Resolution>) -> Self {
        self.resolutions = resolutions.into_iter().collect();
        self
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

    /// Append separators to the cascade.
    pub fn with_separators<S: Into<String>>(mut self, separators: impl IntoIterator<Item = S>) -> Self {
        self.splitter = self.splitter.with_extra_separators(separators);
        self
    }

    /// Replace the splitter template.
    pub fn with_splitter_options(mut self, splitter: SplitterOptions) -> Self {
        self.splitter = splitter;
        self
    }

    /// Measure chunk length with `measure`.
    pub fn with_length_measure(mut self, measure: Arc<dyn LengthMeasure>) -> Self {
        self.splitter = self.splitter.with_length_measure(measure);
        self
    }

    /// Set the resolve mode.
    pub fn with_resolve_mode(mut self, mode: ResolveMode) -> Self {
        self.resolve_mode = mode;
        self
    }

    /// Fail on unregistered placeholder tokens.
    pub fn strict(self) -> Self {
        self.with_resolve_mode(ResolveMode::Strict)
    }

    /// Set the placeholder policy.
    pub fn with_placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.placeholder_policy = policy;
        self
    }

    /// Enable or disable parallel resolutions.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run resolutions one after another.
    pub fn sequential(self) -> Self {
        self.with_parallel(false)
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            resolutions: DEFAULT_RESOLUTIONS.to_vec(),
            table_format: TableFormat::default(),
            summary_page_count: DEFAULT_SUMMARY_PAGE_COUNT,
            splitter: SplitterOptions::default(),
            resolve_mode: ResolveMode::default(),
            placeholder_policy: PlaceholderPolicy::default(),
            parallel: true,
        }
    }
}
