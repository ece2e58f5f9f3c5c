//! Generator configuration for vitae.
//!
//! The generator config lives at `<site root>/vitae.toml`. It only controls
//! where things are read from and written to, and which bibliography entries
//! count as publications. Site identity (name, author) lives in the content
//! directory as `config.yaml`, see [`crate::SiteConfig`].
//!
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitaeError};

/// Default configuration file name, looked up in the site root.
pub const CONFIG_FILE_NAME: &str = "vitae.toml";

// ---------------------------------------------------------------------------
// Config structs (matching vitae.toml schema)
// ---------------------------------------------------------------------------

/// Top-level generator config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Bibliography selection rules.
    #[serde(default)]
    pub publications: PublicationPolicy,
}

/// `[paths]` section. Relative paths resolve against the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `vita.bib`, `bio.md`, `projects.yaml`, `teaching.yaml`, `config.yaml`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Directory of Tera templates overriding the built-in ones.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Where the rendered HTML pages are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Link prefix for stylesheets and images, as seen from the rendered pages.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            templates_dir: default_templates_dir(),
            output_dir: default_output_dir(),
            static_path: default_static_path(),
        }
    }
}

fn default_data_dir() -> String {
    "data".into()
}
fn default_templates_dir() -> String {
    "templates".into()
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_static_path() -> String {
    "static".into()
}

/// `[publications]` section: which bibliography entries land on which page.
///
/// Keywords are compared lowercased against an entry's `keywords` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationPolicy {
    /// An entry needs at least one of these to appear on the publications page.
    #[serde(default = "default_include_keywords")]
    pub include_keywords: Vec<String>,

    /// Any of these removes an entry from the publications page.
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    /// Entries whose title contains one of these (case-insensitive) are dropped.
    #[serde(default = "default_exclude_title_terms")]
    pub exclude_title_terms: Vec<String>,

    /// Keyword marking a submission for the "current research" list.
    #[serde(default = "default_under_review_keyword")]
    pub under_review_keyword: String,
}

impl Default for PublicationPolicy {
    fn default() -> Self {
        Self {
            include_keywords: default_include_keywords(),
            exclude_keywords: default_exclude_keywords(),
            exclude_title_terms: default_exclude_title_terms(),
            under_review_keyword: default_under_review_keyword(),
        }
    }
}

fn default_include_keywords() -> Vec<String> {
    // "tecnical_report" is a misspelling that exists in real bibliographies.
    [
        "peer_reviewed",
        "technical_report",
        "tecnical_report",
        "open_source",
        "essay",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_exclude_keywords() -> Vec<String> {
    vec!["edited".into()]
}
fn default_exclude_title_terms() -> Vec<String> {
    vec!["ritools".into()]
}
fn default_under_review_keyword() -> String {
    "under_review".into()
}

// ---------------------------------------------------------------------------
// Resolved paths (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Absolute-ish locations of every input and output, resolved against a site root.
#[derive(Debug, Clone)]
pub struct SitePaths {
    /// The site root all relative config paths resolve against.
    pub root: PathBuf,
    /// Content directory.
    pub data_dir: PathBuf,
    /// Template override directory (may not exist).
    pub templates_dir: PathBuf,
    /// Output directory for rendered pages.
    pub output_dir: PathBuf,
    /// Static asset prefix passed to templates verbatim.
    pub static_path: String,
}

impl SitePaths {
    /// Resolve the `[paths]` section against `root`.
    pub fn resolve(root: &Path, config: &AppConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            data_dir: root.join(&config.paths.data_dir),
            templates_dir: root.join(&config.paths.templates_dir),
            output_dir: root.join(&config.paths.output_dir),
            static_path: config.paths.static_path.clone(),
        }
    }

    pub fn bibliography(&self) -> PathBuf {
        self.data_dir.join("vita.bib")
    }

    pub fn bio(&self) -> PathBuf {
        self.data_dir.join("bio.md")
    }

    pub fn projects(&self) -> PathBuf {
        self.data_dir.join("projects.yaml")
    }

    pub fn teaching(&self) -> PathBuf {
        self.data_dir.join("teaching.yaml")
    }

    pub fn site_config(&self) -> PathBuf {
        self.data_dir.join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file inside a site root.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the generator config for a site root. Returns defaults if the file does not exist.
pub fn load_config(root: &Path) -> Result<AppConfig> {
    let path = config_file_path(root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the generator config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| VitaeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| VitaeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into the site root.
/// Refuses to overwrite an existing file. Returns the path to the created file.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root).map_err(|e| VitaeError::io(root, e))?;

    let path = config_file_path(root);
    if path.exists() {
        return Err(VitaeError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| VitaeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| VitaeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
