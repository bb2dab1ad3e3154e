//! Mapping split chunks back to pages and expanding placeholders.

use super::batch::DocumentBatch;
use super::placeholder::{token_pattern, PlaceholderPolicy, PlaceholderRegistry};
use crate::error::{Error, Result};
use crate::model::Chunk;
use crate::split::SplitChunk;

/// How unregistered placeholder tokens are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Fail the batch with [`Error::RenderingInconsistency`].
    Strict,
    /// Keep the raw token and log a warning.
    #[default]
    Lenient,
}

/// Rewrites split chunks into page-relative [`Chunk`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvenanceResolver {
    /// Handling of unregistered tokens
    pub mode: ResolveMode,
    /// Lifetime of registry entries
    pub policy: PlaceholderPolicy,
}

impl ProvenanceResolver {
    /// Create a lenient resolver that retains registry entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resolve mode.
    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the placeholder policy.
    pub fn with_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve every chunk split from `batch`, in order.
    ///
    /// Chunks must carry a start index into the batch text.
    pub fn resolve(&self, batch: &mut DocumentBatch<'_>, chunks: Vec<SplitChunk>) -> Result<Vec<Chunk>> {
        let mut resolved = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let start = chunk
                .start_index
                .ok_or_else(|| Error::Provenance("chunk carries no start index".to_string()))?;
            let content = self.expand(&chunk.text, start, batch.registry_mut())?;

            let range = batch.page_at(start).ok_or_else(|| {
                Error::Provenance(format!("offset {} is outside every page of the batch", start))
            })?;
            resolved.push(Chunk::new(content, range.page_number, start - range.start));
        }

        let unexpanded = batch.registry().unexpanded();
        if !unexpanded.is_empty() {
            log::debug!(
                "{} placeholder(s) never expanded: {}",
                unexpanded.len(),
                unexpanded.join(", ")
            );
        }

        Ok(resolved)
    }

    /// Replace every placeholder token in `text` with its rendering.
    ///
    /// `start` is the char offset of `text` in the batch. A registered token
    /// is only expanded where the assembler inserted it; the same string
    /// appearing in page text is left alone.
    pub fn expand(&self, text: &str, start: usize, registry: &mut PlaceholderRegistry) -> Result<String> {
        if !text.contains("@page_") {
            return Ok(text.to_string());
        }

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        let mut offset = start;

        for found in token_pattern().find_iter(text) {
            let token = found.as_str();
            let before = &text[last..found.start()];
            offset += before.chars().count();
            output.push_str(before);
            last = found.end();

            let at = offset;
            offset += token.chars().count();

            if registry.is_known(token) && !registry.is_placeholder_at(at) {
                log::debug!("{} at offset {} is page text, left as is", token, at);
                output.push_str(token);
                continue;
            }
            if let Some(rendering) = registry.expand(token, self.policy) {
                output.push_str(&rendering);
                continue;
            }

            if self.policy == PlaceholderPolicy::ConsumeOnce && registry.was_expanded(token) {
                log::debug!("Placeholder {} already consumed, left as is", token);
            } else if self.mode == ResolveMode::Strict {
                return Err(Error::RenderingInconsistency(token.to_string()));
            } else {
                log::warn!("Placeholder {} is not registered, left as is", token);
            }
            output.push_str(token);
        }

        output.push_str(&text[last..]);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, Page, Rect, TableGrid};
    use crate::pipeline::BatchAssembler;

    fn table_page() -> Vec<Page> {
        let mut first = Page::new(1, 612.0, 792.0);
        first.add_element(Element::text(1, Rect::default(), "abc\n"));
        let mut second = Page::new(2, 612.0, 792.0);
        second.add_element(Element::text(1, Rect::default(), "de"));
        second.add_element(Element::table(2, Rect::default(), TableGrid::from_strings([["h"]])));
        vec![first, second]
    }

    fn split(text: &str, start: usize) -> SplitChunk {
        SplitChunk {
            text: text.to_string(),
            start_index: Some(start),
        }
    }

    #[test]
    fn test_page_relative_offsets() {
        let pages = table_page();
        let mut batch = BatchAssembler::new().assemble_batch(&pages);

        let chunks = ProvenanceResolver::new()
            .resolve(&mut batch, vec![split("abc", 0), split("bc", 1), split("de", 4)])
            .unwrap();

        assert_eq!(chunks[0], Chunk::new("abc", 1, 0));
        assert_eq!(chunks[1], Chunk::new("bc", 1, 1));
        assert_eq!(chunks[2], Chunk::new("de", 2, 0));
    }

    #[test]
    fn test_expands_placeholders() {
        let pages = table_page();
        let mut batch = BatchAssembler::new().assemble_batch(&pages);

        let chunks = ProvenanceResolver::new()
            .resolve(&mut batch, vec![split("de@page_2_element_2_table@", 4)])
            .unwrap();

        assert_eq!(chunks[0].content, "de| h |\n| --- |\n");
        assert_eq!(chunks[0].metadata.page_number, 2);
    }

    #[test]
    fn test_retain_expands_in_every_chunk() {
        let pages = table_page();
        let mut batch = BatchAssembler::new().assemble_batch(&pages);
        let token = "@page_2_element_2_table@";

        let chunks = ProvenanceResolver::new()
            .resolve(&mut batch, vec![split(token, 6), split(token, 6)])
            .unwrap();

        assert!(chunks.iter().all(|c| !c.content.contains(token)));
    }

    #[test]
    fn test_consume_once_leaves_later_copies() {
        let pages = table_page();
        let mut batch = BatchAssembler::new().assemble_batch(&pages);
        let token = "@page_2_element_2_table@";
        let resolver = ProvenanceResolver::new()
            .with_policy(PlaceholderPolicy::ConsumeOnce)
            .with_mode(ResolveMode::Strict);

        let chunks = resolver
            .resolve(&mut batch, vec![split(token, 6), split(token, 6)])
            .unwrap();

        assert_eq!(chunks[0].content, "| h |\n| --- |\n");
        assert_eq!(chunks[1].content, token);
    }

    #[test]
    fn test_registered_token_in_page_text_is_literal() {
        let token = "@page_2_element_2_table@";
        let mut first = Page::new(1, 612.0, 792.0);
        first.add_element(Element::text(1, Rect::default(), format!("see {token}\n")));
        let mut pages = vec![first];
        pages.extend(table_page().into_iter().skip(1));
        let mut batch = BatchAssembler::new().assemble_batch(&pages);

        // "see " + token + "\n" is 29 chars, then "de", then the real token.
        let chunks = ProvenanceResolver::new()
            .with_mode(ResolveMode::Strict)
            .resolve(&mut batch, vec![split(&format!("see {token}"), 0), split(&format!("de{token}"), 29)])
            .unwrap();

        assert_eq!(chunks[0].content, format!("see {token}"));
        assert_eq!(chunks[1].content, "de| h |\n| --- |\n");
        assert_eq!(chunks[1].metadata.page_number, 2);
    }

    #[test]
    fn test_unknown_token() {
        let pages = table_page();
        let unknown = "x@page_9_element_1_image@";

        let mut batch = BatchAssembler::new().assemble_batch(&pages);
        let lenient = ProvenanceResolver::new()
            .resolve(&mut batch, vec![split(unknown, 0)])
            .unwrap();
        assert_eq!(lenient[0].content, unknown);

        let mut batch = BatchAssembler::new().assemble_batch(&pages);
        let strict = ProvenanceResolver::new()
            .with_mode(ResolveMode::Strict)
            .resolve(&mut batch, vec![split(unknown, 0)]);
        assert!(matches!(strict, Err(Error::RenderingInconsistency(t)) if t == "@page_9_element_1_image@"));
    }

    #[test]
    fn test_missing_start_index() {
        let pages = table_page();
        let mut batch = BatchAssembler::new().assemble_batch(&pages);
        let chunk = SplitChunk {
            text: "abc".to_string(),
            start_index: None,
        };

        let result = ProvenanceResolver::new().resolve(&mut batch, vec![chunk]);
        assert!(matches!(result, Err(Error::Provenance(_))));
    }
}
