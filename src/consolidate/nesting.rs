//! Nested table resolution.
//!
//! Table extraction often reports a table nested inside another twice: once
//! as its own region and once flattened into the cells of the outer region.
//! The arena below keeps one [`TableRegion`] per detected table and links
//! nested regions to the outermost table that owns them, stripping the
//! flattened copies out of the outer cells on the way.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{RawTable, Rect, TableGrid};

/// Nesting state of a table region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nesting {
    /// Not involved in any containment relation
    #[default]
    None,
    /// Owns nested regions; expands into its children when formatted
    Parent,
    /// Nested in another region; never surfaces at top level
    Child,
}

/// Working state for one detected table.
#[derive(Debug, Clone)]
pub struct TableRegion {
    /// Arena index, stable for the whole pass
    pub id: usize,
    /// Bounding box on the page
    pub bbox: Rect,
    /// Cell grid, stripped of nested duplicates
    pub grid: TableGrid,
    /// Nesting state
    pub nesting: Nesting,
    /// Linked region ids in insertion order (self first for a parent)
    pub children: Vec<usize>,
}

impl TableRegion {
    fn link(&mut self, id: usize) {
        if !self.children.contains(&id) {
            self.children.push(id);
        }
    }
}

/// Arena of table regions for a single page.
#[derive(Debug, Clone, Default)]
pub struct TableArena {
    regions: Vec<TableRegion>,
}

impl TableArena {
    /// Build an arena from a page's raw tables.
    pub fn new(tables: &[RawTable]) -> Self {
        let regions = tables
            .iter()
            .enumerate()
            .map(|(id, table)| TableRegion {
                id,
                bbox: table.bbox,
                grid: table.grid.clone(),
                nesting: Nesting::None,
                children: Vec::new(),
            })
            .collect();
        Self { regions }
    }

    /// Get a region by id.
    pub fn get(&self, id: usize) -> Option<&TableRegion> {
        self.regions.get(id)
    }

    /// Number of regions, nested ones included.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if the arena has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions that surface at top level (everything except children).
    pub fn top_level(&self) -> impl Iterator<Item = &TableRegion> {
        self.regions.iter().filter(|r| r.nesting != Nesting::Child)
    }

    /// Resolve containment between every ordered pair of regions.
    pub fn resolve_nesting(&mut self) -> Result<()> {
        let count = self.regions.len();
        for outer in 0..count {
            for inner in 0..count {
                if outer == inner || !self.regions[outer].bbox.contains(&self.regions[inner].bbox)
                {
                    continue;
                }

                let pattern = duplicate_pattern(&self.regions[inner].grid)?;
                let stripped = strip_duplicates(&mut self.regions[outer].grid, &pattern);
                log::debug!(
                    "table {} nested in table {} ({} cells stripped)",
                    inner,
                    outer,
                    stripped
                );

                if self.regions[outer].nesting == Nesting::Child {
                    // Redirect to the region that already owns `outer`.
                    let ancestor = self
                        .regions
                        .iter()
                        .position(|r| r.id != outer && r.children.contains(&outer));
                    let Some(ancestor) = ancestor else {
                        continue;
                    };
                    // Identical boxes contain each other; never demote the owner.
                    if ancestor == inner {
                        continue;
                    }
                    self.regions[ancestor].link(inner);
                    self.regions[ancestor].link(outer);
                    self.regions[inner].nesting = Nesting::Child;
                } else {
                    let region = &mut self.regions[outer];
                    region.link(outer);
                    region.link(inner);
                    region.nesting = Nesting::Parent;
                    self.regions[inner].nesting = Nesting::Child;
                }
            }
        }
        Ok(())
    }
}

/// Pattern matching a flattened copy of `grid`: its first row's text, then
/// anything, then its last row's text.
fn duplicate_pattern(grid: &TableGrid) -> Result<Regex> {
    let pattern = format!(
        "(?s){}.*?{}",
        regex::escape(&grid.first_row_text()),
        regex::escape(&grid.last_row_text())
    );
    Regex::new(&pattern).map_err(|e| Error::Other(format!("nested table pattern: {}", e)))
}

/// Remove every match of `pattern` from the non-empty cells of `grid`.
/// Returns the number of cells changed.
fn strip_duplicates(grid: &mut TableGrid, pattern: &Regex) -> usize {
    let mut changed = 0;
    for cell in grid.cells_mut() {
        if cell.is_empty() || !pattern.is_match(cell) {
            continue;
        }
        let replaced = pattern.replace_all(cell, "").into_owned();
        if replaced != *cell {
            *cell = replaced;
            changed += 1;
        }
    }
    changed
}
