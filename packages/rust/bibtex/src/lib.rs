//! Minimal BibTeX reader and the field formatting used on publication pages.
//!
//! The parser understands the subset of BibTeX found in hand-maintained
//! bibliographies: `@type{key, name = {value}, name = "value", name = 2020}`.
//! Nested braces inside values are balanced, `%` comments are stripped, and
//! `@comment`, `@preamble` and `@string` blocks are skipped. String macros and
//! `#` concatenation are not expanded.

mod fields;
mod parser;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use vitae_shared::{Result, VitaeError};

pub use fields::{
    format_authors, format_date, format_month, month_number, parse_keywords, safe_year,
};
pub use parser::parse_bibtex;

/// One bibliography record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibEntry {
    /// Lowercased entry type (`article`, `inproceedings`, `unpublished`, ...).
    pub entry_type: String,
    /// Citation key; may be empty for sloppy entries.
    pub key: String,
    /// Field values keyed by lowercased field name.
    pub fields: BTreeMap<String, String>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion, mostly for tests.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert a field, overwriting an earlier value of the same name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_lowercase(), value.into());
    }

    /// Field value by (case-insensitive) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Field value, or `""` when absent.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// First non-empty value among `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_empty())
    }
}

/// Read and parse a `.bib` file.
pub fn parse_bibtex_file(path: &Path) -> Result<Vec<BibEntry>> {
    let source = std::fs::read_to_string(path).map_err(|e| VitaeError::io(path, e))?;
    parse_bibtex(&source).map_err(|e| match e {
        VitaeError::Parse { message } => {
            VitaeError::parse(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}
