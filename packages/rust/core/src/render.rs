//! Tera template environment.
//!
//! The built-in templates are compiled into the binary. Any `*.html` file in
//! the site's templates directory (searched recursively) replaces the built-in
//! template of the same name or adds a new one, so a site can restyle a single
//! page or just `base.html`.

use std::collections::BTreeMap;
use std::path::Path;

use tera::Tera;
use tracing::{debug, instrument};

use vitae_shared::{Result, VitaeError};

use crate::context::Page;

/// Built-in templates, keyed by template name.
const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("publications.html", include_str!("../templates/publications.html")),
    ("projects.html", include_str!("../templates/projects.html")),
    ("teaching.html", include_str!("../templates/teaching.html")),
];

/// Compiled templates, ready to render pages.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Only the built-in templates.
    #[cfg(test)]
    pub(crate) fn builtin() -> Result<Self> {
        Self::from_sources(builtin_sources())
    }

    /// Built-in templates overlaid with the `*.html` files under `templates_dir`.
    ///
    /// A missing directory is not an error.
    #[instrument(skip_all, fields(dir = %templates_dir.display()))]
    pub fn new(templates_dir: &Path) -> Result<Self> {
        let mut sources = builtin_sources();

        if templates_dir.is_dir() {
            let mut overrides = BTreeMap::new();
            collect_templates(templates_dir, templates_dir, &mut overrides)?;
            debug!(count = overrides.len(), "loaded template overrides");
            sources.extend(overrides);
        } else {
            debug!("no template directory, using built-in templates");
        }

        Self::from_sources(sources)
    }

    fn from_sources(sources: BTreeMap<String, String>) -> Result<Self> {
        let mut tera = Tera::default();
        // Added together so `extends`/`import` resolve regardless of order.
        tera.add_raw_templates(sources.iter().map(|(name, body)| (name.as_str(), body.as_str())))
            .map_err(|e| template_error("loading templates", &e))?;
        Ok(Self { tera })
    }

    /// Render a page with its JSON context.
    pub fn render(&self, page: Page, context: &serde_json::Value) -> Result<String> {
        self.render_template(page.template_name(), context)
    }

    /// Render any loaded template by name.
    pub fn render_template(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let context =
            tera::Context::from_serialize(context).map_err(|e| template_error(name, &e))?;
        self.tera
            .render(name, &context)
            .map_err(|e| template_error(name, &e))
    }

    /// Names of all loaded templates, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

fn builtin_sources() -> BTreeMap<String, String> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, body)| ((*name).to_string(), (*body).to_string()))
        .collect()
}

/// Recursively read `*.html` files, naming each by its `/`-separated path under `root`.
fn collect_templates(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| VitaeError::io(dir, e))?;

    for entry in entries {
        let path = entry.map_err(|e| VitaeError::io(dir, e))?.path();
        if path.is_dir() {
            collect_templates(root, &path, out)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let body = std::fs::read_to_string(&path).map_err(|e| VitaeError::io(&path, e))?;

        debug!(template = %name, "read template");
        out.insert(name, body);
    }

    Ok(())
}

/// Flatten Tera's error chain; the useful detail is usually in a `source`.
fn template_error(name: &str, err: &tera::Error) -> VitaeError {
    let mut message = format!("{name}: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    VitaeError::Template(message)
}
