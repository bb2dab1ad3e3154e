//! Rendering module: tables and images for placeholder expansion, plus
//! plain text and JSON exports.

mod json;
mod table;
mod text;

pub use json::{to_json, JsonFormat};
pub use table::{to_html_table, to_markdown_table, TableFormat};
pub use text::{to_text, write_text, IMAGE_MARKER};

use crate::model::ImageData;

/// Render an image for substitution into chunk text.
///
/// The payload passes through unchanged, carried as a `data:` URI.
pub fn render_image(image: &ImageData) -> String {
    image.to_data_uri()
}
