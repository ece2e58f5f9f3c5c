//! Per-page template contexts.
//!
//! Every page sees the same common keys (`site_name`, `author_name`,
//! `current_year`, `static_path`, `vita_pdf`, `site`) plus a `title` and its
//! own data. Contexts are plain `Serialize` values, which is also what the
//! CLI prints for `vitae dump`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use vitae_bibtex::BibEntry;
use vitae_shared::{Course, Project, Projects, Result, SiteConfig, VitaeError};

use crate::publications::{CurrentResearch, Publication};

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The fixed set of pages a site consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Publications,
    Projects,
    Teaching,
}

impl Page {
    /// All pages, in render order.
    pub const ALL: [Page; 4] = [
        Page::Index,
        Page::Publications,
        Page::Projects,
        Page::Teaching,
    ];

    /// Short lowercase name used on the command line and in logs.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Publications => "publications",
            Page::Projects => "projects",
            Page::Teaching => "teaching",
        }
    }

    /// Template the page renders from; also its output file name.
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Publications => "publications.html",
            Page::Projects => "projects.html",
            Page::Teaching => "teaching.html",
        }
    }

    /// File name written to the output directory.
    pub fn output_file(self) -> &'static str {
        self.template_name()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = VitaeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.slug() == s.trim().to_lowercase())
            .ok_or_else(|| {
                VitaeError::validation(format!(
                    "unknown page '{s}': expected index, publications, projects, or teaching"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Site data
// ---------------------------------------------------------------------------

/// Everything loaded and derived from the data directory for one run.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub site: SiteConfig,
    /// Biography, already rendered to HTML.
    pub bio_html: String,
    /// The raw bibliography, before selection.
    pub entries: Vec<BibEntry>,
    pub publications: Vec<Publication>,
    pub current_research: Vec<CurrentResearch>,
    pub projects: Projects,
    pub courses: Vec<Course>,
    /// Static asset prefix for links in templates.
    pub static_path: String,
    /// Copyright year shown in the footer.
    pub current_year: i32,
}

// ---------------------------------------------------------------------------
// Context structs
// ---------------------------------------------------------------------------

/// Keys shared by every page.
#[derive(Debug, Serialize)]
struct CommonContext<'a> {
    site_name: &'a str,
    author_name: &'a str,
    current_year: i32,
    static_path: &'a str,
    vita_pdf: Option<&'a str>,
    site: &'a BTreeMap<String, serde_yaml::Value>,
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct PageContext<'a, T: Serialize> {
    #[serde(flatten)]
    common: CommonContext<'a>,
    #[serde(flatten)]
    page: T,
}

#[derive(Debug, Serialize)]
struct IndexContext<'a> {
    bio_html: &'a str,
}

#[derive(Debug, Serialize)]
struct PublicationsContext<'a> {
    pub_entries: &'a [Publication],
}

#[derive(Debug, Serialize)]
struct ProjectsContext<'a> {
    current_projects: &'a [Project],
    backburner_projects: &'a [Project],
    software_projects: &'a [Project],
    current_research: &'a [CurrentResearch],
}

#[derive(Debug, Serialize)]
struct TeachingContext<'a> {
    courses: &'a [Course],
}

/// Page heading / `<title>` text.
pub fn page_title(page: Page, data: &SiteData) -> &str {
    match page {
        Page::Index => &data.site.site_name,
        Page::Publications => "Publications",
        Page::Projects => "Research & Projects",
        Page::Teaching => "Teaching",
    }
}

/// Build the template context for one page as a JSON object.
pub fn page_context(page: Page, data: &SiteData) -> Result<serde_json::Value> {
    let common = CommonContext {
        site_name: &data.site.site_name,
        author_name: &data.site.author_name,
        current_year: data.current_year,
        static_path: &data.static_path,
        vita_pdf: data.site.vita_pdf.as_deref(),
        site: &data.site.extra,
        title: page_title(page, data),
    };

    match page {
        Page::Index => to_json(PageContext {
            common,
            page: IndexContext {
                bio_html: &data.bio_html,
            },
        }),
        Page::Publications => to_json(PageContext {
            common,
            page: PublicationsContext {
                pub_entries: &data.publications,
            },
        }),
        Page::Projects => to_json(PageContext {
            common,
            page: ProjectsContext {
                current_projects: &data.projects.current,
                backburner_projects: &data.projects.backburner,
                software_projects: &data.projects.software,
                current_research: &data.current_research,
            },
        }),
        Page::Teaching => to_json(PageContext {
            common,
            page: TeachingContext {
                courses: &data.courses,
            },
        }),
    }
}

fn to_json<T: Serialize>(context: T) -> Result<serde_json::Value> {
    serde_json::to_value(context)
        .map_err(|e| VitaeError::validation(format!("context serialization failed: {e}")))
}
