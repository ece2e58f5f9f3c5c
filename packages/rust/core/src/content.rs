//! Loading the site's content files.
//!
//! Every loader treats a missing file as empty content: a fresh site with only
//! a bibliography, or only a biography, still renders.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use vitae_bibtex::BibEntry;
use vitae_shared::{Course, Projects, Result, SiteConfig, VitaeError};

/// Site identity from `config.yaml`.
pub fn load_site_config(path: &Path) -> Result<SiteConfig> {
    load_yaml(path)
}

/// Project groups from `projects.yaml`.
pub fn load_projects(path: &Path) -> Result<Projects> {
    load_yaml(path)
}

/// Course list from `teaching.yaml`.
pub fn load_courses(path: &Path) -> Result<Vec<Course>> {
    load_yaml(path)
}

/// Biography Markdown rendered to HTML.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_bio(path: &Path) -> Result<String> {
    match read_optional(path)? {
        Some(text) => Ok(vitae_markdown::render_bio(&text)),
        None => Ok(String::new()),
    }
}

/// Parsed `vita.bib`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_bibliography(path: &Path) -> Result<Vec<BibEntry>> {
    if !path.exists() {
        debug!("bibliography not found, no publications");
        return Ok(Vec::new());
    }
    vitae_bibtex::parse_bibtex_file(path)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Deserialize a YAML file; missing files and empty documents yield `T::default()`.
fn load_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let Some(content) = read_optional(path)? else {
        return Ok(T::default());
    };
    if is_blank_yaml(&content) {
        return Ok(T::default());
    }

    let parsed: Option<T> = serde_yaml::from_str(&content)
        .map_err(|e| VitaeError::parse(format!("failed to parse {}: {e}", path.display())))?;
    Ok(parsed.unwrap_or_default())
}

/// Only comments, document markers, and blank lines.
fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Read a file, or `None` when it does not exist.
fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        debug!(path = %path.display(), "content file not found, treating as empty");
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| VitaeError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "read content file");
    Ok(Some(content))
}
