//! Chunking configuration resolved from the environment.

use std::collections::HashMap;
use std::env;

use crate::error::{Error, Result};
use crate::pipeline::{Resolution, DEFAULT_RESOLUTIONS, DEFAULT_SUMMARY_PAGE_COUNT};
use crate::render::TableFormat;

/// Comma-separated chunk sizes, one per resolution.
pub const CHUNK_SIZE_LIST_ENV: &str = "CHUNK_SIZE_LIST";
/// Comma-separated chunk overlaps, paired with [`CHUNK_SIZE_LIST_ENV`].
pub const CHUNK_OVERLAP_LIST_ENV: &str = "CHUNK_OVERLAP_LIST";
/// Table rendering, `markdown` or `html`.
pub const TABLE_FORMAT_ENV: &str = "TABLE_FORMAT";
/// Maximum number of pages per batch.
pub const DOC_SUM_NUM_ENV: &str = "DOC_SUM_NUM";

/// Chunking configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Chunk size of each resolution
    pub chunk_sizes: Vec<usize>,
    /// Chunk overlap of each resolution
    pub chunk_overlaps: Vec<usize>,
    /// Rendering of tables substituted into chunks
    pub table_format: TableFormat,
    /// Maximum number of pages per batch
    pub summary_page_count: usize,
}

impl ChunkConfig {
    /// Read the configuration from the process environment, falling back
    /// to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut values = HashMap::new();
        for name in [
            CHUNK_SIZE_LIST_ENV,
            CHUNK_OVERLAP_LIST_ENV,
            TABLE_FORMAT_ENV,
            DOC_SUM_NUM_ENV,
        ] {
            match env::var(name) {
                Ok(value) => {
                    values.insert(name, value);
                }
                Err(env::VarError::NotPresent) => {}
                Err(e) => return Err(Error::config(format!("failed to read {}: {}", name, e))),
            }
        }
        Self::from_lookup(|name| values.get(name).cloned())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let chunk_sizes = match lookup(CHUNK_SIZE_LIST_ENV) {
            Some(value) => parse_list(CHUNK_SIZE_LIST_ENV, &value)?,
            None => defaults.chunk_sizes,
        };
        let chunk_overlaps = match lookup(CHUNK_OVERLAP_LIST_ENV) {
            Some(value) => parse_list(CHUNK_OVERLAP_LIST_ENV, &value)?,
            None => defaults.chunk_overlaps,
        };
        let table_format = match lookup(TABLE_FORMAT_ENV) {
            Some(value) => value.parse()?,
            None => defaults.table_format,
        };
        let summary_page_count = match lookup(DOC_SUM_NUM_ENV) {
            Some(value) => parse_count(DOC_SUM_NUM_ENV, &value)?,
            None => defaults.summary_page_count,
        };

        log::debug!("{}: {:?}", CHUNK_SIZE_LIST_ENV, chunk_sizes);
        log::debug!("{}: {:?}", CHUNK_OVERLAP_LIST_ENV, chunk_overlaps);
        log::debug!("{}: {}", TABLE_FORMAT_ENV, table_format);
        log::debug!("{}: {}", DOC_SUM_NUM_ENV, summary_page_count);

        Ok(Self {
            chunk_sizes,
            chunk_overlaps,
            table_format,
            summary_page_count,
        })
    }

    /// Check that sizes and overlaps pair up into usable resolutions.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_sizes.is_empty() {
            return Err(Error::config("chunk size list is empty"));
        }
        if self.chunk_sizes.len() != self.chunk_overlaps.len() {
            return Err(Error::config(format!(
                "{} chunk sizes but {} chunk overlaps",
                self.chunk_sizes.len(),
                self.chunk_overlaps.len()
            )));
        }
        for (size, overlap) in self.chunk_sizes.iter().zip(&self.chunk_overlaps) {
            if *size == 0 {
                return Err(Error::config("chunk sizes must be positive"));
            }
            if overlap >= size {
                return Err(Error::config(format!(
                    "chunk overlap {} must be smaller than chunk size {}",
                    overlap, size
                )));
            }
        }
        if self.summary_page_count == 0 {
            return Err(Error::config("summary page count must be positive"));
        }
        Ok(())
    }

    /// Pair sizes with overlaps.
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.chunk_sizes
            .iter()
            .zip(&self.chunk_overlaps)
            .map(|(size, overlap)| Resolution::new(*size, *overlap))
            .collect()
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_sizes: DEFAULT_RESOLUTIONS.iter().map(|r| r.chunk_size).collect(),
            chunk_overlaps: DEFAULT_RESOLUTIONS.iter().map(|r| r.chunk_overlap).collect(),
            table_format: TableFormat::default(),
            summary_page_count: DEFAULT_SUMMARY_PAGE_COUNT,
        }
    }
}

fn parse_list(name: &str, value: &str) -> Result<Vec<usize>> {
    value
        .split(',')
        .map(|item| parse_count(name, item))
        .collect()
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("invalid {} value {:?}: {}", name, value, e)))
}
