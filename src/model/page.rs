//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{ImageData, Rect, TableGrid};

/// A consolidated page: typed elements in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Content elements on the page
    pub elements: Vec<Element>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Check if the page is empty (no elements).
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Count elements of one kind.
    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }
}

/// One typed unit of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Sequential number within the page, starting at 1
    pub number: u32,

    /// Bounding box on the page
    pub bbox: Rect,

    /// Element content
    pub value: ElementValue,
}

impl Element {
    /// Create a text element.
    pub fn text(number: u32, bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            number,
            bbox,
            value: ElementValue::Text(text.into()),
        }
    }

    /// Create an image element.
    pub fn image(number: u32, bbox: Rect, image: ImageData) -> Self {
        Self {
            number,
            bbox,
            value: ElementValue::Image(image),
        }
    }

    /// Create a table element.
    pub fn table(number: u32, bbox: Rect, grid: TableGrid) -> Self {
        Self {
            number,
            bbox,
            value: ElementValue::Table(grid),
        }
    }

    /// Get the element kind.
    pub fn kind(&self) -> ElementKind {
        match self.value {
            ElementValue::Text(_) => ElementKind::Text,
            ElementValue::Image(_) => ElementKind::Image,
            ElementValue::Table(_) => ElementKind::Table,
        }
    }
}

/// Element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ElementValue {
    /// Text
    Text(String),
    /// Image
    Image(ImageData),
    /// Table cell grid
    Table(TableGrid),
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Text block
    Text,
    /// Image block
    Image,
    /// Table region
    Table,
}

impl ElementKind {
    /// Lowercase name, as used in placeholder tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Table => "table",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
