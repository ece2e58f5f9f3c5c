//! End-to-end build: data directory → parse → contexts → templates → HTML files.

use std::time::Instant;

use chrono::Datelike;
use tracing::{info, instrument};

use vitae_shared::{PublicationPolicy, Result, SitePaths};

use crate::content;
use crate::context::{Page, SiteData, page_context};
use crate::publications::{build_current_research, build_publication_list};
use crate::render::Renderer;
use crate::writer::{self, WriteStatus, WrittenPage};

/// Configuration for the `generate_site` pipeline.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Resolved input/output locations.
    pub paths: SitePaths,
    /// Bibliography selection rules.
    pub policy: PublicationPolicy,
    /// Render everything but write nothing.
    pub dry_run: bool,
    /// Footer year; the current UTC year when `None`.
    pub current_year: Option<i32>,
}

impl GenerateConfig {
    pub fn new(paths: SitePaths, policy: PublicationPolicy) -> Self {
        Self {
            paths,
            policy,
            dry_run: false,
            current_year: None,
        }
    }
}

/// One rendered page, before it hits the disk.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: Page,
    pub html: String,
}

/// How much content went into the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteCounts {
    pub bib_entries: usize,
    pub publications: usize,
    pub current_research: usize,
    pub projects: usize,
    pub courses: usize,
}

impl SiteCounts {
    pub fn of(data: &SiteData) -> Self {
        Self {
            bib_entries: data.entries.len(),
            publications: data.publications.len(),
            current_research: data.current_research.len(),
            projects: data.projects.len(),
            courses: data.courses.len(),
        }
    }
}

/// Result of the `generate_site` pipeline.
#[derive(Debug)]
pub struct GenerateResult {
    /// Every page that was rendered, in render order.
    pub rendered: Vec<RenderedPage>,
    /// Write outcomes; empty on a dry run.
    pub written: Vec<WrittenPage>,
    pub counts: SiteCounts,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

impl GenerateResult {
    /// Pages whose file content actually changed.
    pub fn changed(&self) -> usize {
        self.written
            .iter()
            .filter(|page| page.status == WriteStatus::Written)
            .count()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is rendered.
    fn page_rendered(&self, page: Page, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_rendered(&self, _page: Page, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Load every content file and derive the publication lists.
#[instrument(skip_all, fields(data_dir = %config.paths.data_dir.display()))]
pub fn collect_site(config: &GenerateConfig) -> Result<SiteData> {
    let paths = &config.paths;

    let site = content::load_site_config(&paths.site_config())?;
    let bio_html = content::load_bio(&paths.bio())?;
    let entries = content::load_bibliography(&paths.bibliography())?;
    let projects = content::load_projects(&paths.projects())?;
    let courses = content::load_courses(&paths.teaching())?;

    let publications = build_publication_list(&entries, &config.policy);
    let current_research = build_current_research(&entries, &config.policy);

    let current_year = config
        .current_year
        .unwrap_or_else(|| chrono::Utc::now().year());

    let data = SiteData {
        site,
        bio_html,
        entries,
        publications,
        current_research,
        projects,
        courses,
        static_path: paths.static_path.clone(),
        current_year,
    };

    let counts = SiteCounts::of(&data);
    info!(
        bib_entries = counts.bib_entries,
        publications = counts.publications,
        current_research = counts.current_research,
        projects = counts.projects,
        courses = counts.courses,
        "content loaded"
    );

    Ok(data)
}

/// Render every page in memory.
pub fn render_site(
    renderer: &Renderer,
    data: &SiteData,
    progress: &dyn ProgressReporter,
) -> Result<Vec<RenderedPage>> {
    let total = Page::ALL.len();
    let mut rendered = Vec::with_capacity(total);

    for (i, page) in Page::ALL.into_iter().enumerate() {
        let context = page_context(page, data)?;
        let html = renderer.render(page, &context)?;
        progress.page_rendered(page, i + 1, total);
        rendered.push(RenderedPage { page, html });
    }

    Ok(rendered)
}

/// Run the full build.
///
/// 1. Load content (site config, biography, bibliography, projects, courses)
/// 2. Select and sort publications
/// 3. Compile templates
/// 4. Render pages
/// 5. Write changed pages to the output directory
#[instrument(skip_all, fields(root = %config.paths.root.display(), dry_run = config.dry_run))]
pub fn generate_site(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult> {
    let start = Instant::now();

    info!("starting site generation");

    progress.phase("Loading content");
    let data = collect_site(config)?;

    progress.phase("Compiling templates");
    let renderer = Renderer::new(&config.paths.templates_dir)?;

    progress.phase("Rendering pages");
    let rendered = render_site(&renderer, &data, progress)?;

    let mut written = Vec::new();
    if !config.dry_run {
        progress.phase("Writing pages");
        for page in &rendered {
            written.push(writer::write_page(
                &config.paths.output_dir,
                page.page.output_file(),
                &page.html,
            )?);
        }
    }

    let result = GenerateResult {
        rendered,
        written,
        counts: SiteCounts::of(&data),
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.rendered.len(),
        changed = result.changed(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "site generation complete"
    );
    progress.done(&result);

    Ok(result)
}
