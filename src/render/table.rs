//! Table rendering to Markdown and HTML.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::TableGrid;

/// Output format for tables substituted into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Pipe table with a `---` separator row
    #[default]
    Markdown,
    /// `<table>` with `<th>` header cells and `<td>` data cells
    Html,
}

impl TableFormat {
    /// Render a grid in this format.
    pub fn render(&self, grid: &TableGrid) -> String {
        match self {
            TableFormat::Markdown => to_markdown_table(grid),
            TableFormat::Html => to_html_table(grid),
        }
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(TableFormat::Markdown),
            "html" => Ok(TableFormat::Html),
            other => Err(Error::Configuration(format!(
                "unknown table format {:?} (expected markdown or html)",
                other
            ))),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Markdown => write!(f, "markdown"),
            TableFormat::Html => write!(f, "html"),
        }
    }
}

/// Render a grid as a Markdown pipe table. Empty grids render as "".
pub fn to_markdown_table(grid: &TableGrid) -> String {
    let Some(header) = grid.header() else {
        return String::new();
    };

    let mut output = String::new();
    push_markdown_row(&mut output, header);

    output.push('|');
    for _ in header {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in grid.body() {
        push_markdown_row(&mut output, row);
    }
    output
}

fn push_markdown_row(output: &mut String, row: &[Option<String>]) {
    output.push_str("| ");
    output.push_str(
        &row.iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    output.push_str(" |\n");
}

/// Render a grid as an HTML table. Empty grids render as "".
pub fn to_html_table(grid: &TableGrid) -> String {
    let Some(header) = grid.header() else {
        return String::new();
    };

    let mut output = String::from("<table>\n");
    push_html_row(&mut output, header, "th");
    for row in grid.body() {
        push_html_row(&mut output, row, "td");
    }
    output.push_str("</table>");
    output
}

fn push_html_row(output: &mut String, row: &[Option<String>], tag: &str) {
    output.push_str("<tr>");
    for cell in row {
        output.push_str(&format!("<{}>{}</{}>", tag, cell.as_deref().unwrap_or(""), tag));
    }
    output.push_str("</tr>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableGrid {
        TableGrid::new(vec![
            vec![Some("Name".into()), Some("Age".into())],
            vec![Some("Alice".into()), None],
            vec![Some("Bob".into()), Some("25".into())],
        ])
    }

    #[test]
    fn test_markdown_table() {
        assert_eq!(
            to_markdown_table(&sample()),
            "| Name | Age |\n| --- | --- |\n| Alice |  |\n| Bob | 25 |\n"
        );
    }

    #[test]
    fn test_html_table() {
        assert_eq!(
            to_html_table(&sample()),
            "<table>\n<tr><th>Name</th><th>Age</th></tr>\n\
             <tr><td>Alice</td><td></td></tr>\n\
             <tr><td>Bob</td><td>25</td></tr>\n</table>"
        );
    }

    #[test]
    fn test_empty_grid() {
        let grid = TableGrid::default();
        assert_eq!(to_markdown_table(&grid), "");
        assert_eq!(to_html_table(&grid), "");
    }

    #[test]
    fn test_header_only() {
        let grid = TableGrid::from_strings([["a", "b"]]);
        assert_eq!(TableFormat::Markdown.render(&grid), "| a | b |\n| --- | --- |\n");
    }

    #[test]
    fn test_parse_table_format() {
        assert_eq!("markdown".parse::<TableFormat>().unwrap(), TableFormat::Markdown);
        assert_eq!(" HTML ".parse::<TableFormat>().unwrap(), TableFormat::Html);
        assert!("latex".parse::<TableFormat>().is_err());
        assert_eq!(TableFormat::Html.to_string(), "html");
    }
}
