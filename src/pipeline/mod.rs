//! Chunking pipeline: batch assembly, splitting, provenance resolution.
//!
//! Tables and images are serialized as placeholder tokens so the splitter
//! never cuts through them, measured at their rendered size, and expanded
//! once chunks have been mapped back to their pages.

mod batch;
mod multiscale;
mod options;
mod placeholder;
mod provenance;

pub use batch::{BatchAssembler, DocumentBatch, PageRange, DEFAULT_SUMMARY_PAGE_COUNT};
pub use multiscale::MultiScaleChunker;
pub use options::{ChunkOptions, Resolution, DEFAULT_RESOLUTIONS};
pub use placeholder::{placeholder_token, PlaceholderAwareLength, PlaceholderPolicy, PlaceholderRegistry};
pub use provenance::{ProvenanceResolver, ResolveMode};
