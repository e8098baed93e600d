//! Spreadsheet → HTML table conversion.
//!
//! Projects embed tables two ways: a `[TABLE:results.xlsx]` marker inside
//! their content, or a `table_filename` rendered after the content. Both go
//! through a [`TableSource`], which always returns displayable HTML. A table
//! that cannot be loaded turns into a visible inline error paragraph rather
//! than failing the page.
//!
//! [`SpreadsheetTables`] reads the first worksheet of any workbook format
//! `calamine` understands (xlsx, xlsm, xls, ods). The first row becomes the
//! table header.

use calamine::{Reader, open_workbook_auto};
use log::warn;
use maud::{Markup, html};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("table file not found: {0}")]
    NotFound(PathBuf),
    #[error("table path must stay inside the tables directory: {0}")]
    UnsafePath(String),
    #[error("could not read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },
    #[error("spreadsheet has no data: {0}")]
    Empty(PathBuf),
}

/// Anything that can turn a table filename into an HTML fragment.
pub trait TableSource {
    /// Render `filename` as HTML. Never fails: problems are rendered inline.
    fn load_table(&self, filename: &str) -> String;
}

/// Tables read from spreadsheets under a single directory.
#[derive(Debug, Clone)]
pub struct SpreadsheetTables {
    dir: PathBuf,
}

impl SpreadsheetTables {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve `filename` inside the tables directory, refusing anything
    /// that would escape it.
    fn resolve(&self, filename: &str) -> Result<PathBuf, TableError> {
        let relative = Path::new(filename);
        let safe = !filename.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(TableError::UnsafePath(filename.to_string()));
        }
        Ok(self.dir.join(relative))
    }

    /// Read the first worksheet as rows of display strings.
    pub fn read_rows(&self, filename: &str) -> Result<Vec<Vec<String>>, TableError> {
        let path = self.resolve(filename)?;
        if !path.is_file() {
            return Err(TableError::NotFound(path));
        }

        let spreadsheet_err = |message: String| TableError::Spreadsheet {
            path: path.clone(),
            message,
        };
        let mut workbook = open_workbook_auto(&path).map_err(|e| spreadsheet_err(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::Empty(path.clone()))?
            .map_err(|e| spreadsheet_err(e.to_string()))?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        if rows.is_empty() {
            return Err(TableError::Empty(path));
        }
        Ok(rows)
    }
}

impl TableSource for SpreadsheetTables {
    fn load_table(&self, filename: &str) -> String {
        match self.read_rows(filename) {
            Ok(rows) => table_html(&rows),
            Err(e) => {
                warn!("{e}");
                error_html(&e)
            }
        }
    }
}

/// Render rows as a striped table. The first row is the header.
///
/// The output is a single line so it survives being embedded in markdown
/// as a raw HTML block. Line breaks inside cells become `<br>`.
pub fn table_html(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    html! {
        table.table.table-striped {
            thead {
                tr { @for cell in header { th { (cell_text(cell)) } } }
            }
            tbody {
                @for row in body {
                    tr { @for cell in row { td { (cell_text(cell)) } } }
                }
            }
        }
    }
    .into_string()
}

fn cell_text(text: &str) -> Markup {
    html! {
        @for (i, line) in text.lines().enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

/// Inline fragment shown in place of a table that failed to load.
pub fn error_html(error: &TableError) -> String {
    html! {
        p.table-error { "Error loading table data: " (error) }
    }
    .into_string()
}
