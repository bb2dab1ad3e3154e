//! Recursive separator-cascade text splitter.

use std::collections::VecDeque;
use std::sync::Arc;

use regex::Regex;

use super::{LengthMeasure, SplitterOptions};
use crate::error::{Error, Result};

/// A chunk of split text with its optional start offset (in chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitChunk {
    /// Chunk text
    pub text: String,
    /// Offset of the chunk in the source text, when tracking is enabled
    pub start_index: Option<usize>,
}

#[derive(Debug)]
struct Separator {
    raw: String,
    pattern: Regex,
}

/// Splits text on the coarsest separator present, merging pieces into
/// windows of at most `chunk_size` with up to `chunk_overlap` carried over,
/// and recursing with finer separators into pieces that are too large.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    options: SplitterOptions,
    separators: Arc<[Separator]>,
}

impl RecursiveSplitter {
    /// Validate options and compile the separator cascade.
    pub fn new(options: SplitterOptions) -> Result<Self> {
        if options.chunk_size == 0 {
            return Err(Error::config("chunk_size must be positive"));
        }
        if options.chunk_overlap >= options.chunk_size {
            return Err(Error::config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                options.chunk_overlap, options.chunk_size
            )));
        }
        if options.separators.is_empty() {
            return Err(Error::config("separator cascade is empty"));
        }

        let separators = options
            .separators
            .iter()
            .map(|raw| {
                let source = if options.is_separator_regex {
                    raw.clone()
                } else {
                    regex::escape(raw)
                };
                Regex::new(&source)
                    .map(|pattern| Separator {
                        raw: raw.clone(),
                        pattern,
                    })
                    .map_err(|e| Error::config(format!("invalid separator {:?}: {}", raw, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            options,
            separators: separators.into(),
        })
    }

    /// Get the options this splitter was built with.
    pub fn options(&self) -> &SplitterOptions {
        &self.options
    }

    /// Copy of this splitter measuring length with `measure`.
    pub fn with_length_measure(&self, measure: Arc<dyn LengthMeasure>) -> Self {
        Self {
            options: self.options.clone().with_length_measure(measure),
            separators: Arc::clone(&self.separators),
        }
    }

    /// Split text into chunk strings.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Split text into chunks, locating each chunk in `text` when
    /// `add_start_index` is set.
    pub fn create_chunks(&self, text: &str) -> Result<Vec<SplitChunk>> {
        let pieces = self.split_text(text);
        if !self.options.add_start_index {
            return Ok(pieces
                .into_iter()
                .map(|text| SplitChunk {
                    text,
                    start_index: None,
                })
                .collect());
        }

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut previous: Option<usize> = None;
        let mut cursor_byte = 0;
        let mut cursor_char = 0;

        for piece in pieces {
            // Search strictly after the previous match's start.
            let from = match previous {
                None => 0,
                Some(start) => {
                    start + text[start..].chars().next().map(char::len_utf8).unwrap_or(1)
                }
            };
            let byte = text
                .get(from..)
                .and_then(|rest| rest.find(piece.as_str()))
                .map(|i| from + i)
                .ok_or_else(|| {
                    Error::Provenance(format!(
                        "chunk {:?} not found after offset {}",
                        truncate_for_log(&piece),
                        cursor_char
                    ))
                })?;

            cursor_char += text[cursor_byte..byte].chars().count();
            cursor_byte = byte;
            previous = Some(byte);

            chunks.push(SplitChunk {
                text: piece,
                start_index: Some(cursor_char),
            });
        }

        Ok(chunks)
    }

    fn measure(&self, text: &str) -> usize {
        self.options.length_measure.measure(text)
    }

    fn split_recursive(&self, text: &str, separators: &[Separator]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let (separator, fallback) = active_separator(text, separators);
        let Some(separator) = separator else {
            return final_chunks;
        };

        let splits = split_on(text, separator, self.options.keep_separator);

        let mut good_splits: Vec<Split<'_>> = Vec::new();
        for split in splits {
            if self.measure(split.piece) < self.options.chunk_size {
                good_splits.push(split);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }
            if fallback.is_empty() {
                // Atomic piece: emitted whole, over budget.
                final_chunks.extend(self.finish_chunk(split.piece.to_string()));
            } else {
                final_chunks.extend(self.split_recursive(split.piece, fallback));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }
        final_chunks
    }

    /// Combine small pieces into windows of at most `chunk_size`. Pieces in
    /// a window are joined with the delimiter text that separated them in
    /// the source, so every window is a substring of it.
    fn merge_splits(&self, splits: &[Split<'_>]) -> Vec<String> {
        let chunk_size = self.options.chunk_size;
        let chunk_overlap = self.options.chunk_overlap;

        let mut docs = Vec::new();
        let mut current: VecDeque<Split<'_>> = VecDeque::new();
        let mut total = 0usize;

        for &split in splits {
            let len = self.measure(split.piece);
            let gap = self.measure(split.gap);
            let overhead = |current: &VecDeque<Split<'_>>| if current.is_empty() { 0 } else { gap };

            if total + len + overhead(&current) > chunk_size {
                if total > chunk_size {
                    log::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = self.join_pieces(&current) {
                        docs.push(doc);
                    }
                    // Slide the window: keep at most `chunk_overlap` of trailing
                    // context, and only as much as still leaves room for `split`.
                    while total > chunk_overlap
                        || (total + len + overhead(&current) > chunk_size && total > 0)
                    {
                        let Some(first) = current.pop_front() else {
                            break;
                        };
                        let next_gap = current.front().map(|next| self.measure(next.gap)).unwrap_or(0);
                        total = total.saturating_sub(self.measure(first.piece) + next_gap);
                    }
                }
            }

            total += len + overhead(&current);
            current.push_back(split);
        }

        if let Some(doc) = self.join_pieces(&current) {
            docs.push(doc);
        }
        docs
    }

    fn join_pieces(&self, splits: &VecDeque<Split<'_>>) -> Option<String> {
        let mut text = String::new();
        for (i, split) in splits.iter().enumerate() {
            if i > 0 {
                text.push_str(split.gap);
            }
            text.push_str(split.piece);
        }
        self.finish_chunk(text)
    }

    fn finish_chunk(&self, text: String) -> Option<String> {
        let text = if self.options.strip_whitespace {
            text.trim().to_string()
        } else {
            text
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Pick the first separator present in `text`; the rest become the fallback
/// list. An empty separator ends the scan. Falls back to the last entry with
/// no further fallback when nothing matches.
fn active_separator<'s>(
    text: &str,
    separators: &'s [Separator],
) -> (Option<&'s Separator>, &'s [Separator]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.raw.is_empty() {
            return (Some(separator), &[]);
        }
        if separator.pattern.is_match(text) {
            return (Some(separator), &separators[i + 1..]);
        }
    }
    (separators.last(), &[])
}

/// A piece of split text and the source text between it and the previous
/// non-empty piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Split<'t> {
    gap: &'t str,
    piece: &'t str,
}

/// Split `text` on `separator`, dropping empty pieces.
fn split_on<'t>(text: &'t str, separator: &Separator, keep_separator: bool) -> Vec<Split<'t>> {
    let ranges: Vec<(usize, usize)> = if separator.raw.is_empty() {
        text.char_indices().map(|(i, c)| (i, i + c.len_utf8())).collect()
    } else {
        let mut ranges = Vec::new();
        let mut last = 0;
        for m in separator.pattern.find_iter(text) {
            let end = if keep_separator { m.end() } else { m.start() };
            ranges.push((last, end));
            last = m.end();
        }
        ranges.push((last, text.len()));
        ranges
    };

    let mut splits = Vec::with_capacity(ranges.len());
    let mut previous_end = 0;
    for (start, end) in ranges {
        if start == end {
            continue;
        }
        splits.push(Split {
            gap: &text[previous_end..start],
            piece: &text[start..end],
        });
        previous_end = end;
    }
    splits
}

fn truncate_for_log(text: &str) -> String {
    text.chars().take(40).collect()
}
