//! Placeholder tokens standing in for tables and images during splitting.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::model::ElementKind;
use crate::split::LengthMeasure;

/// What happens to a registry entry once it has been expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Keep entries until the whole batch is resolved, so a token repeated
    /// by the overlap window expands in every chunk that carries it.
    #[default]
    Retain,
    /// Remove an entry on its first expansion. Later copies of the token
    /// are left unexpanded.
    ConsumeOnce,
}

/// Build the token for element `element` of page `page`.
pub fn placeholder_token(page: u32, element: u32, kind: ElementKind) -> String {
    format!("@page_{}_element_{}_{}@", page, element, kind.as_str())
}

/// Pattern matching any well-formed placeholder token.
pub(crate) fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"@page_\d+_element_\d+_(?:table|image)@").expect("placeholder pattern is valid")
    })
}

/// Rendered content for every placeholder token of one batch.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRegistry {
    entries: HashMap<String, Arc<str>>,
    expanded: HashSet<String>,
    offsets: HashSet<usize>,
}

impl PlaceholderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rendering` for `token`, replacing any previous entry.
    pub fn register(&mut self, token: impl Into<String>, rendering: impl Into<Arc<str>>) {
        self.entries.insert(token.into(), rendering.into());
    }

    /// Register `rendering` for a token inserted at char `offset` of the
    /// batch text.
    pub fn register_at(&mut self, token: impl Into<String>, offset: usize, rendering: impl Into<Arc<str>>) {
        self.register(token, rendering);
        self.offsets.insert(offset);
    }

    /// Whether a placeholder was inserted at char `offset`. Token-shaped
    /// text anywhere else came from the page itself.
    pub fn is_placeholder_at(&self, offset: usize) -> bool {
        self.offsets.contains(&offset)
    }

    /// Whether `token` is or was registered.
    pub fn is_known(&self, token: &str) -> bool {
        self.contains(token) || self.was_expanded(token)
    }

    /// Look up a token's rendering.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(|r| r.as_ref())
    }

    /// Whether `token` is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a token's rendering for expansion, recording the use.
    /// With [`PlaceholderPolicy::ConsumeOnce`] the entry is removed.
    pub fn expand(&mut self, token: &str, policy: PlaceholderPolicy) -> Option<Arc<str>> {
        let rendering = match policy {
            PlaceholderPolicy::Retain => self.entries.get(token).cloned(),
            PlaceholderPolicy::ConsumeOnce => self.entries.remove(token),
        }?;
        self.expanded.insert(token.to_string());
        Some(rendering)
    }

    /// Whether `token` was expanded at least once.
    pub fn was_expanded(&self, token: &str) -> bool {
        self.expanded.contains(token)
    }

    /// Registered tokens that were never expanded, sorted.
    pub fn unexpanded(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self
            .entries
            .keys()
            .filter(|t| !self.expanded.contains(*t))
            .map(String::as_str)
            .collect();
        tokens.sort_unstable();
        tokens
    }

    /// Length measure that sees every registered token at its rendered size.
    pub fn length_measure(&self, inner: Arc<dyn LengthMeasure>) -> PlaceholderAwareLength {
        PlaceholderAwareLength {
            inner,
            renderings: Arc::new(self.entries.clone()),
        }
    }
}

/// Measures text with every known placeholder replaced by its rendering.
///
/// Unknown tokens are measured as written.
#[derive(Clone)]
pub struct PlaceholderAwareLength {
    inner: Arc<dyn LengthMeasure>,
    renderings: Arc<HashMap<String, Arc<str>>>,
}

impl LengthMeasure for PlaceholderAwareLength {
    fn measure(&self, text: &str) -> usize {
        if self.renderings.is_empty() || !text.contains("@page_") {
            return self.inner.measure(text);
        }

        let expanded = token_pattern().replace_all(text, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            self.renderings
                .get(token)
                .map(|r| r.to_string())
                .unwrap_or_else(|| token.to_string())
        });
        self.inner.measure(&expanded)
    }

    fn name(&self) -> &str {
        "placeholder-aware"
    }
}
