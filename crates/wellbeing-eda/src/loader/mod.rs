//! Loading delimited files into a record table.
//!
//! The loader preserves column names and row order exactly as they appear in
//! the file. No schema is enforced: absent columns are tolerated and checked
//! by later stages before use. Cells holding a standard missing marker
//! (`NA`, `NaN`, `null`, ...) are read as missing values.

mod sanitizers;

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, info};

/// Loader for comma-separated files with a header row.
pub struct CsvLoader;

impl CsvLoader {
    /// Load a CSV file into a table.
    ///
    /// The file is read fully and released before parsing. Any missing,
    /// unreadable or unparsable input is reported as [`EdaError::LoadFailed`]
    /// naming the path.
    pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let source = path.display().to_string();

        if !path.exists() {
            return Err(EdaError::load(source, "file not found"));
        }

        info!("Loading dataset from: {}", source);
        let content = std::fs::read_to_string(path).map_err(|e| EdaError::load(&source, e))?;

        let df = Self::load_from_str(&content, &source)?;
        info!("Dataset loaded successfully: {:?}", df.shape());
        Ok(df)
    }

    /// Load CSV from any reader, e.g. an in-memory buffer.
    pub fn load_from_reader<R: Read>(mut reader: R, source: &str) -> Result<DataFrame> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| EdaError::load(source, e))?;
        Self::load_from_str(&content, source)
    }

    /// Parse CSV text held in memory. `source` names the input in errors.
    pub fn load_from_str(content: &str, source: &str) -> Result<DataFrame> {
        if content.trim().is_empty() {
            return Err(EdaError::load(source, "no header row"));
        }

        let df = parse_with_fallbacks(content).map_err(|e| EdaError::load(source, e))?;
        let (df, replaced) =
            sanitizers::replace_missing_markers(df).map_err(|e| EdaError::load(source, e))?;
        if replaced > 0 {
            debug!("{} cells in '{}' hold a missing marker", replaced, source);
        }
        Ok(df)
    }
}

/// Parse with quote handling first, then retry on content stripped of
/// doubled quotes and blank lines.
fn parse_with_fallbacks(content: &str) -> PolarsResult<DataFrame> {
    match parse_csv(content.to_string(), true) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    let cleaned = clean_csv_content(content);
    parse_csv(cleaned, false)
}

fn parse_csv(content: String, quoted: bool) -> PolarsResult<DataFrame> {
    let mut options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None);
    if quoted {
        options =
            options.with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')));
    }
    options
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()
}

/// Clean CSV content
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
