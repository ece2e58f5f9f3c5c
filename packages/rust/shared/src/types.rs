//! Content types read from the site's data directory.
//!
//! All of these deserialize from YAML. Keys without a typed field are kept in
//! a flattened `extra` map so templates can still reach them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

/// Site identity from `data/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Shown in the page title and header.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// The person the site is about.
    #[serde(default = "default_author_name")]
    pub author_name: String,
    /// Optional link to a CV/vita PDF.
    #[serde(default)]
    pub vita_pdf: Option<String>,
    /// Any other keys (email, affiliation, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            author_name: default_author_name(),
            vita_pdf: None,
            extra: BTreeMap::new(),
        }
    }
}

fn default_site_name() -> String {
    "My Site".into()
}
fn default_author_name() -> String {
    "Author".into()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// A research or software project from `data/projects.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The three project groups of `data/projects.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projects {
    /// Actively pursued.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current: Vec<Project>,
    /// Paused, but not abandoned.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub backburner: Vec<Project>,
    /// Released software.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub software: Vec<Project>,
}

/// A YAML key with no items (`backburner:`) parses as null; treat it as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Projects {
    /// Total number of projects across all groups.
    pub fn len(&self) -> usize {
        self.current.len() + self.backburner.len() + self.software.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// A taught course from `data/teaching.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub title: String,
    /// Catalog code, e.g. `PS 531`.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    /// Free-form term label, e.g. `Fall 2024`.
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_config_defaults_when_keys_missing() {
        let config: SiteConfig = serde_yaml::from_str("email: me@example.edu\n").expect("parse");
        assert_eq!(config.site_name, "My Site");
        assert_eq!(config.author_name, "Author");
        assert!(config.vita_pdf.is_none());
        assert_eq!(
            config.extra.get("email").and_then(|v| v.as_str()),
            Some("me@example.edu")
        );
    }

    #[test]
    fn projects_keep_unknown_keys() {
        let yaml = r#"
current:
  - title: Causal inference with networks
    description: Spillovers in field experiments.
    collaborators: [A. Author, B. Author]
software:
  - title: RItools
    url: https://github.com/markmfredrickson/RItools
"#;
        let projects: Projects = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(projects.current.len(), 1);
        assert!(projects.backburner.is_empty());
        assert_eq!(projects.len(), 2);
        assert!(projects.current[0].extra.contains_key("collaborators"));
        assert_eq!(
            projects.software[0].url.as_deref(),
            Some("https://github.com/markmfredrickson/RItools")
        );
    }

    #[test]
    fn empty_project_group_is_not_an_error() {
        let projects: Projects = serde_yaml::from_str("current:\nbackburner:\n").expect("parse");
        assert!(projects.is_empty());
    }

    #[test]
    fn course_keeps_missing_fields_as_null() {
        let course: Course =
            serde_yaml::from_str("title: Research Design\nterm: Fall 2024\nroom: 101\n")
                .expect("parse");
        assert_eq!(course.term.as_deref(), Some("Fall 2024"));
        assert!(course.code.is_none());
        assert!(course.extra.contains_key("room"));

        let yaml = serde_yaml::to_string(&course).expect("serialize");
        assert!(yaml.contains("code: null"));
    }
}
