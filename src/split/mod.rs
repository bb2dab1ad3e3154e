//! Size- and overlap-bounded text splitting.
//!
//! Nothing in this module knows about pages or placeholders; the pipeline
//! plugs document concerns in through [`LengthMeasure`].

mod measure;
mod options;
mod recursive;

pub use measure::{CharCount, FnMeasure, LengthMeasure};
pub use options::{SplitterOptions, DEFAULT_SEPARATORS};
pub use recursive::{RecursiveSplitter, SplitChunk};
