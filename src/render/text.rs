//! Plain text dump of consolidated pages.
//!
//! A debugging/export view: each page starts with a `page_number: N` line,
//! text is written verbatim, images become a marker line and tables a
//! pipe-delimited grid framed by dashed lines.

use std::io::Write;

use crate::error::Result;
use crate::model::{ElementValue, Page, TableGrid};

/// Marker line written in place of an image.
pub const IMAGE_MARKER: &str = "========= image ===========";

/// Render pages to a plain text string.
pub fn to_text(pages: &[Page]) -> String {
    let mut output = String::new();
    for page in pages {
        push_page(&mut output, page);
    }
    output
}

/// Write the plain text dump of `pages` to `writer`.
pub fn write_text<W: Write>(pages: &[Page], mut writer: W) -> Result<()> {
    for page in pages {
        let mut output = String::new();
        push_page(&mut output, page);
        writer.write_all(output.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn push_page(output: &mut String, page: &Page) {
    output.push_str(&format!("page_number: {}\n", page.number));
    for element in &page.elements {
        match &element.value {
            ElementValue::Text(text) => output.push_str(text),
            ElementValue::Image(_) => {
                output.push_str(IMAGE_MARKER);
                output.push('\n');
            }
            ElementValue::Table(grid) => push_table(output, grid),
        }
    }
}

fn push_table(output: &mut String, grid: &TableGrid) {
    let Some(header) = grid.header() else {
        return;
    };

    let rule = vec!["-".repeat(10); header.len()].join("|");
    output.push_str(&rule);
    output.push('\n');
    push_row(output, header);
    output.push_str(&rule);
    output.push('\n');
    for row in grid.body() {
        push_row(output, row);
    }
}

fn push_row(output: &mut String, row: &[Option<String>]) {
    output.push_str(
        &row.iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("|"),
    );
    output.push('\n');
}
