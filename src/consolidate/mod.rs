//! Element consolidation: raw page primitives to an ordered element list.
//!
//! A page extractor reports text blocks and table regions independently, so
//! table text shows up twice: once inside the table grid and once as the
//! blocks the table was drawn from. Consolidation resolves nested tables,
//! replaces blocks covered by a table with a single reference to that table,
//! and numbers the resulting elements sequentially.

mod nesting;

pub use nesting::{Nesting, TableArena, TableRegion};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Element, ImageData, Page, RawBlock, RawPage, RawPayload};

/// Merges raw blocks and tables into consolidated pages.
#[derive(Debug, Clone)]
pub struct ElementConsolidator {
    parallel: bool,
}

/// Entry of the merged block/table sequence.
#[derive(Debug, Clone, Copy)]
enum MergedEntry<'a> {
    /// Reference to a top-level table region
    Table(usize),
    /// A block kept as-is
    Block(&'a RawBlock),
}

impl ElementConsolidator {
    /// Create a consolidator that processes pages in parallel.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enable or disable parallel processing of pages.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Consolidate every page, keeping page order.
    pub fn consolidate_all(&self, pages: &[RawPage]) -> Result<Vec<Page>> {
        log::debug!(
            "consolidating {} pages ({})",
            pages.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );
        if self.parallel {
            pages.par_iter().map(|p| self.consolidate(p)).collect()
        } else {
            pages.iter().map(|p| self.consolidate(p)).collect()
        }
    }

    /// Consolidate one page.
    pub fn consolidate(&self, raw: &RawPage) -> Result<Page> {
        validate(raw)?;

        let mut arena = TableArena::new(&raw.tables);
        arena.resolve_nesting()?;

        let merged = merge_blocks(&raw.blocks, &arena);
        let elements = format_elements(raw.number, &merged, &arena);
        log::debug!(
            "page {}: {} blocks + {} tables -> {} elements",
            raw.number,
            raw.blocks.len(),
            raw.tables.len(),
            elements.len()
        );

        Ok(Page {
            number: raw.number,
            width: raw.width,
            height: raw.height,
            elements,
        })
    }
}

impl Default for ElementConsolidator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(raw: &RawPage) -> Result<()> {
    for block in &raw.blocks {
        if !block.bbox.is_well_formed() {
            return Err(Error::structural(
                raw.number,
                format!("block {} has malformed bbox {:?}", block.order, block.bbox),
            ));
        }
    }
    for (i, table) in raw.tables.iter().enumerate() {
        if !table.bbox.is_well_formed() {
            return Err(Error::structural(
                raw.number,
                format!("table {} has malformed bbox {:?}", i, table.bbox),
            ));
        }
        if table.grid.is_empty() {
            return Err(Error::structural(
                raw.number,
                format!("table {} has no rows", i),
            ));
        }
        if !table.grid.is_rectangular() {
            return Err(Error::structural(
                raw.number,
                format!("table {} has ragged rows", i),
            ));
        }
    }
    Ok(())
}

/// Replace text blocks covered by a top-level table with one reference to
/// that table, in original block order.
fn merge_blocks<'a>(blocks: &'a [RawBlock], arena: &TableArena) -> Vec<MergedEntry<'a>> {
    let mut merged = Vec::with_capacity(blocks.len());
    let mut referenced: Vec<usize> = Vec::new();

    for block in blocks {
        let owner = if block.is_text() {
            arena.top_level().find(|t| t.bbox.contains(&block.bbox))
        } else {
            None
        };

        match owner {
            Some(table) => {
                if !referenced.contains(&table.id) {
                    referenced.push(table.id);
                    merged.push(MergedEntry::Table(table.id));
                }
            }
            None => merged.push(MergedEntry::Block(block)),
        }
    }

    merged
}

/// Expand the merged sequence into numbered elements.
fn format_elements(page: u32, merged: &[MergedEntry<'_>], arena: &TableArena) -> Vec<Element> {
    let mut elements = Vec::with_capacity(merged.len());
    let mut number = 0u32;

    for entry in merged {
        match *entry {
            MergedEntry::Table(id) => {
                let Some(region) = arena.get(id) else {
                    continue;
                };
                let members = match region.nesting {
                    Nesting::Parent => region.children.as_slice(),
                    _ => std::slice::from_ref(&region.id),
                };
                for member in members.iter().filter_map(|&m| arena.get(m)) {
                    number += 1;
                    elements.push(Element::table(number, member.bbox, member.grid.clone()));
                }
            }
            MergedEntry::Block(block) => {
                number += 1;
                match &block.payload {
                    RawPayload::Text { text } => {
                        elements.push(Element::text(number, block.bbox, text.clone()));
                    }
                    RawPayload::Image { data } => match ImageData::from_bytes(data.clone()) {
                        Ok(image) => elements.push(Element::image(number, block.bbox, image)),
                        Err(e) => {
                            log::warn!("page {}: dropping image block {}: {}", page, block.order, e)
                        }
                    },
                }
            }
        }
    }

    elements
}
