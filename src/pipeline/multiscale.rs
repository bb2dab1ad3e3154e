//! Multi-resolution chunking over consolidated pages.

use std::sync::Arc;

use rayon::prelude::*;

use super::batch::BatchAssembler;
use super::options::{ChunkOptions, Resolution};
use super::provenance::ProvenanceResolver;
use crate::error::{Error, Result};
use crate::model::{Chunk, Page};
use crate::split::RecursiveSplitter;

/// Runs batch assembly, splitting and provenance resolution once per
/// resolution and concatenates the results in resolution order.
#[derive(Debug, Clone)]
pub struct MultiScaleChunker {
    passes: Vec<(Resolution, RecursiveSplitter)>,
    assembler: BatchAssembler,
    resolver: ProvenanceResolver,
    parallel: bool,
}

impl MultiScaleChunker {
    /// Validate options and build one splitter per resolution.
    pub fn new(options: ChunkOptions) -> Result<Self> {
        if options.resolutions.is_empty() {
            return Err(Error::config("at least one resolution is required"));
        }
        if options.summary_page_count == 0 {
            return Err(Error::config("summary_page_count must be positive"));
        }

        let passes = options
            .resolutions
            .iter()
            .map(|resolution| {
                let splitter_options = options
                    .splitter
                    .clone()
                    .with_chunk_size(resolution.chunk_size)
                    .with_chunk_overlap(resolution.chunk_overlap)
                    .with_start_index(true);
                RecursiveSplitter::new(splitter_options).map(|splitter| (*resolution, splitter))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            passes,
            assembler: BatchAssembler::new()
                .with_table_format(options.table_format)
                .with_summary_page_count(options.summary_page_count),
            resolver: ProvenanceResolver::new()
                .with_mode(options.resolve_mode)
                .with_policy(options.placeholder_policy),
            parallel: options.parallel,
        })
    }

    /// Resolutions this chunker runs, in output order.
    pub fn resolutions(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.passes.iter().map(|(resolution, _)| *resolution)
    }

    /// Chunk `pages` at every resolution.
    pub fn chunk(&self, pages: &[Page]) -> Result<Vec<Chunk>> {
        let groups: Vec<Vec<Chunk>> = if self.parallel {
            self.passes
                .par_iter()
                .map(|(resolution, splitter)| self.chunk_resolution(*resolution, splitter, pages))
                .collect::<Result<_>>()?
        } else {
            self.passes
                .iter()
                .map(|(resolution, splitter)| self.chunk_resolution(*resolution, splitter, pages))
                .collect::<Result<_>>()?
        };

        Ok(groups.into_iter().flatten().collect())
    }

    fn chunk_resolution(
        &self,
        resolution: Resolution,
        splitter: &RecursiveSplitter,
        pages: &[Page],
    ) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for mut batch in self.assembler.assemble(pages)? {
            let measure = batch
                .registry()
                .length_measure(Arc::clone(&splitter.options().length_measure));
            let pieces = splitter
                .with_length_measure(Arc::new(measure))
                .create_chunks(batch.text())?;
            chunks.extend(self.resolver.resolve(&mut batch, pieces)?);
        }

        log::debug!(
            "Resolution {}/{}: {} chunks from {} pages",
            resolution.chunk_size,
            resolution.chunk_overlap,
            chunks.len(),
            pages.len()
        );
        Ok(chunks)
    }
}
