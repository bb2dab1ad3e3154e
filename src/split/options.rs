//! Splitter options and configuration.

use std::sync::Arc;

use super::{CharCount, LengthMeasure};

/// Default separator cascade: blank line, line break, space, then sentence
/// terminators for CJK and Latin punctuation.
pub const DEFAULT_SEPARATORS: [&str; 8] = ["\n\n", "\n", " ", "。", "！", "？", "!", "?"];

/// Options for [`RecursiveSplitter`](super::RecursiveSplitter).
#[derive(Debug, Clone)]
pub struct SplitterOptions {
    /// Separator cascade, coarsest first
    pub separators: Vec<String>,

    /// Soft upper bound on chunk length
    pub chunk_size: usize,

    /// Trailing context carried into the next chunk
    pub chunk_overlap: usize,

    /// Attach each delimiter to the end of the piece before it
    pub keep_separator: bool,

    /// Treat separators as regular expressions instead of literal text
    pub is_separator_regex: bool,

    /// Trim whitespace from chunk edges and drop blank chunks
    pub strip_whitespace: bool,

    /// Record each chunk's start offset in the source text
    pub add_start_index: bool,

    /// How chunk length is measured
    pub length_measure: Arc<dyn LengthMeasure>,
}

impl SplitterOptions {
    /// Create new splitter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set chunk overlap.
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Replace the separator cascade.
    pub fn with_separators<S: Into<String>>(mut self, separators: impl IntoIterator<Item = S>) -> Self {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Append separators to the cascade, skipping ones already present.
    pub fn with_extra_separators<S: Into<String>>(
        mut self,
        separators: impl IntoIterator<Item = S>,
    ) -> Self {
        for separator in separators {
            let separator = separator.into();
            if !self.separators.contains(&separator) {
                self.separators.push(separator);
            }
        }
        self
    }

    /// Enable or disable keeping separators.
    pub fn with_keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Treat separators as regular expressions.
    pub fn with_regex_separators(mut self, is_regex: bool) -> Self {
        self.is_separator_regex = is_regex;
        self
    }

    /// Enable or disable whitespace stripping.
    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    /// Enable or disable start offset tracking.
    pub fn with_start_index(mut self, add: bool) -> Self {
        self.add_start_index = add;
        self
    }

    /// Set the length measure.
    pub fn with_length_measure(mut self, measure: Arc<dyn LengthMeasure>) -> Self {
        self.length_measure = measure;
        self
    }
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            chunk_size: 4000,
            chunk_overlap: 200,
            keep_separator: true,
            is_separator_regex: false,
            strip_whitespace: true,
            add_start_index: false,
            length_measure: Arc::new(CharCount),
        }
    }
}
