//! Length measures used to size chunks.

use std::fmt;

/// Measures the length of a piece of text.
///
/// The splitter compares these values against `chunk_size` and
/// `chunk_overlap`, so a measure can approximate tokens as well as count
/// characters.
pub trait LengthMeasure: Send + Sync {
    /// Length of `text` in this measure's units.
    fn measure(&self, text: &str) -> usize;

    /// Short name for diagnostics.
    fn name(&self) -> &str {
        "custom"
    }
}

impl fmt::Debug for dyn LengthMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LengthMeasure({})", self.name())
    }
}

/// Counts Unicode scalar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCount;

impl LengthMeasure for CharCount {
    fn measure(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// Adapts a closure into a [`LengthMeasure`].
///
/// ```
/// use pagechunk::split::{FnMeasure, LengthMeasure};
///
/// let words = FnMeasure::new(|text: &str| text.split_whitespace().count());
/// assert_eq!(words.measure("three small words"), 3);
/// ```
pub struct FnMeasure<F> {
    func: F,
}

impl<F> FnMeasure<F>
where
    F: Fn(&str) -> usize + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> LengthMeasure for FnMeasure<F>
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn measure(&self, text: &str) -> usize {
        (self.func)(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_char_count_is_not_bytes() {
        assert_eq!(CharCount.measure("héllo"), 5);
        assert_eq!(CharCount.measure("表格。"), 3);
        assert_eq!(CharCount.measure(""), 0);
    }

    #[test]
    fn test_debug_uses_name() {
        let measure: Arc<dyn LengthMeasure> = Arc::new(CharCount);
        assert_eq!(format!("{:?}", measure), "LengthMeasure(chars)");
    }
}
