/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Tabular rendering of structured payloads.
//!
//! [`render`] turns a [`serde_json::Value`] into a box-drawn grid:
//!
//! - an array of scalars becomes a single `Values` column;
//! - an array of objects gets one column per observed key, in first-seen order;
//! - an object becomes a `Key` / `Value` pair of columns;
//! - anything else degrades to its string form in a single cell.
//!
//! Rendering never fails. Nested arrays and objects inside a cell are shown
//! as compact JSON.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use termlog_rs::table::render;
//!
//! let text = render(&json!(["vite", "plugin"]), 0);
//! assert_eq!(
//!     text,
//!     "┌────────┐\n\
//!      │ Values │\n\
//!      ├────────┤\n\
//!      │ vite   │\n\
//!      │ plugin │\n\
//!      └────────┘"
//! );
//! ```

use serde_json::{Map, Value};

const VALUES_HEADER: &str = "Values";
const KEY_HEADER: &str = "Key";
const VALUE_HEADER: &str = "Value";

/// Renders `value` as a table with `base_indent` spaces on every line.
#[must_use]
pub fn render(value: &Value, base_indent: usize) -> String {
    let grid = match value {
        Value::Array(items) => array_grid(items),
        Value::Object(map) => object_grid(map),
        scalar => Grid {
            headers: vec![VALUES_HEADER.to_string()],
            rows: vec![vec![cell_text(scalar)]],
        },
    };
    grid.draw(base_indent)
}

/// Stringifies a single cell.
///
/// Strings are shown without quotes, compound values as compact JSON.
#[must_use]
pub fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    // a line break inside a cell would break the grid
    text.replace(['\r', '\n'], " ")
}

struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    fn draw(&self, base_indent: usize) -> String {
        let widths = self.widths();
        let margin = " ".repeat(base_indent);

        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(border(&widths, '┌', '┬', '┐'));
        lines.push(row_line(&self.headers, &widths));
        lines.push(border(&widths, '├', '┼', '┤'));
        for row in &self.rows {
            lines.push(row_line(row, &widths));
        }
        lines.push(border(&widths, '└', '┴', '┘'));

        lines
            .into_iter()
            .map(|line| format!("{margin}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn border(widths: &[usize], left: char, cross: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&cross.to_string()))
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(col, &width)| {
            let cell = cells.get(col).map(String::as_str).unwrap_or("");
            format!(" {cell:<width$} ")
        })
        .collect();
    format!("│{}│", padded.join("│"))
}

fn object_grid(map: &Map<String, Value>) -> Grid {
    Grid {
        headers: vec![KEY_HEADER.to_string(), VALUE_HEADER.to_string()],
        rows: map
            .iter()
            .map(|(key, value)| vec![key.clone(), cell_text(value)])
            .collect(),
    }
}

fn array_grid(items: &[Value]) -> Grid {
    let mut keys: Vec<&str> = Vec::new();
    let mut has_scalars = false;

    for item in items {
        match item {
            Value::Object(map) => {
                for key in map.keys() {
                    if !keys.contains(&key.as_str()) {
                        keys.push(key);
                    }
                }
            }
            _ => has_scalars = true,
        }
    }

    // Only scalars (or an empty array): one column of values.
    if keys.is_empty() {
        return Grid {
            headers: vec![VALUES_HEADER.to_string()],
            rows: items.iter().map(|item| vec![cell_text(item)]).collect(),
        };
    }

    let mut headers: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
    if has_scalars {
        headers.push(VALUES_HEADER.to_string());
    }

    let rows = items
        .iter()
        .map(|item| match item {
            Value::Object(map) => {
                let mut row: Vec<String> = keys
                    .iter()
                    .map(|key| map.get(*key).map(cell_text).unwrap_or_default())
                    .collect();
                if has_scalars {
                    row.push(String::new());
                }
                row
            }
            scalar => {
                let mut row = vec![String::new(); keys.len()];
                row.push(cell_text(scalar));
                row
            }
        })
        .collect();

    Grid { headers, rows }
}
