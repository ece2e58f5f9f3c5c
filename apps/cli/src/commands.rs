//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use vitae_core::context::{Page, page_context};
use vitae_core::pipeline::{
    GenerateConfig, GenerateResult, ProgressReporter, SilentProgress, SiteCounts, collect_site,
    generate_site, render_site,
};
use vitae_core::render::Renderer;
use vitae_shared::{AppConfig, SitePaths, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// vitae: a static site generator for academic homepages.
#[derive(Parser)]
#[command(
    name = "vitae",
    version,
    about = "Generate a personal academic website from BibTeX, YAML, and Markdown.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Generator config file (defaults to <root>/vitae.toml).
    #[arg(long, global = true, env = "VITAE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate every page of the site.
    Build {
        /// Site root containing the data and templates directories.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output directory (overrides `paths.output_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Render everything but write nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse all inputs and render all pages in memory.
    Check {
        /// Site root.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Print the template context of a page as JSON.
    Dump {
        /// Page name: index, publications, projects, teaching, or bibliography.
        page: String,

        /// Site root.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a vitae.toml with defaults into the site root.
    Init {
        /// Site root.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Show resolved configuration.
    Show {
        /// Site root.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "vitae=info",
        1 => "vitae=debug",
        _ => "vitae=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.as_deref();
    match cli.command {
        Command::Build { root, out, dry_run } => {
            cmd_build(&root, config_file, out.as_deref(), dry_run)
        }
        Command::Check { root } => cmd_check(&root, config_file),
        Command::Dump { page, root } => cmd_dump(&root, config_file, &page),
        Command::Config { action } => match action {
            ConfigAction::Init { root } => cmd_config_init(&root),
            ConfigAction::Show { root } => cmd_config_show(&root, config_file),
        },
    }
}

/// Load the generator config and resolve site paths for `root`.
fn resolve(root: &Path, config_file: Option<&Path>) -> Result<GenerateConfig> {
    if !root.is_dir() {
        return Err(eyre!("site root '{}' is not a directory", root.display()));
    }

    let app: AppConfig = match config_file {
        Some(path) => load_config_from(path)?,
        None => load_config(root)?,
    };

    Ok(GenerateConfig::new(
        SitePaths::resolve(root, &app),
        app.publications,
    ))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(root: &Path, config_file: Option<&Path>, out: Option<&Path>, dry_run: bool) -> Result<()> {
    let mut config = resolve(root, config_file)?;
    if let Some(out) = out {
        config.paths.output_dir = out.to_path_buf();
    }
    config.dry_run = dry_run;

    info!(
        root = %root.display(),
        out = %config.paths.output_dir.display(),
        dry_run,
        "building site"
    );

    let reporter = CliProgress::new();
    let result = generate_site(&config, &reporter)?;

    println!();
    if dry_run {
        println!("  Dry run: nothing written.");
    } else {
        println!("  Site generated!");
    }
    print_counts(&result.counts);
    println!("  Pages:     {}", result.rendered.len());
    if !dry_run {
        println!("  Changed:   {}", result.changed());
        println!("  Output:    {}", config.paths.output_dir.display());
    }
    println!("  Time:      {:.2}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_check(root: &Path, config_file: Option<&Path>) -> Result<()> {
    let config = resolve(root, config_file)?;
    info!(root = %root.display(), "checking site inputs");

    let summary = check_site(&config)?;

    println!();
    println!("  All inputs parse and all pages render.");
    print_counts(&summary.counts);
    println!("  Templates: {}", summary.templates.join(", "));
    println!("  Pages:     {}", summary.pages);
    println!();

    Ok(())
}

/// What `vitae check` found.
struct CheckSummary {
    counts: SiteCounts,
    templates: Vec<String>,
    pages: usize,
}

/// Load every input and render every page without writing anything.
fn check_site(config: &GenerateConfig) -> Result<CheckSummary> {
    let data = collect_site(config)?;
    let renderer = Renderer::new(&config.paths.templates_dir)?;
    let rendered = render_site(&renderer, &data, &SilentProgress)?;

    Ok(CheckSummary {
        counts: SiteCounts::of(&data),
        templates: renderer
            .template_names()
            .into_iter()
            .map(String::from)
            .collect(),
        pages: rendered.len(),
    })
}

fn cmd_dump(root: &Path, config_file: Option<&Path>, page: &str) -> Result<()> {
    let config = resolve(root, config_file)?;
    let value = dump_value(&config, page)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// JSON for `vitae dump`: a page's template context, or the raw bibliography.
fn dump_value(config: &GenerateConfig, page: &str) -> Result<serde_json::Value> {
    let data = collect_site(config)?;

    if page.trim().eq_ignore_ascii_case("bibliography") {
        return Ok(serde_json::to_value(&data.entries)?);
    }
    let page: Page = page.parse()?;
    Ok(page_context(page, &data)?)
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, config_file: Option<&Path>) -> Result<()> {
    let config: AppConfig = match config_file {
        Some(path) => load_config_from(path)?,
        None => load_config(root)?,
    };
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_counts(counts: &SiteCounts) {
    println!("  Entries:   {}", counts.bib_entries);
    println!("  Published: {}", counts.publications);
    println!("  In review: {}", counts.current_research);
    println!("  Projects:  {}", counts.projects);
    println!("  Courses:   {}", counts.courses);
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_rendered(&self, page: Page, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Rendering [{current}/{total}] {page}"));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_flags_parse() {
        let cli = Cli::try_parse_from([
            "vitae", "-vv", "--log-format", "json", "build", "--root", "site", "--out", "public",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        match cli.command {
            Command::Build { root, out, dry_run } => {
                assert_eq!(root, PathBuf::from("site"));
                assert_eq!(out, Some(PathBuf::from("public")));
                assert!(dry_run);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["vitae", "check", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    fn temp_site(label: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "vitae-cli-test-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(
            root.join("data/vita.bib"),
            "@article{smith2021,\n  title = {Networks},\n  year = {2021},\n  keywords = {peer_reviewed}\n}\n",
        )
        .unwrap();
        std::fs::write(
            root.join("data/teaching.yaml"),
            "- title: Research Design\n  term: Fall 2025\n",
        )
        .unwrap();
        root
    }

    #[test]
    fn dump_page_context() {
        let root = temp_site("dump-page");
        let config = resolve(&root, None).unwrap();

        let value = dump_value(&config, "Teaching").unwrap();
        assert_eq!(value["title"], "Teaching");
        assert_eq!(value["site_name"], "My Site");
        assert_eq!(value["courses"][0]["title"], "Research Design");

        let value = dump_value(&config, "publications").unwrap();
        assert_eq!(value["pub_entries"][0]["title"], "Networks");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn dump_bibliography_lists_raw_entries() {
        let root = temp_site("dump-bib");
        let config = resolve(&root, None).unwrap();

        let value = dump_value(&config, " bibliography ").unwrap();
        let entries = value.as_array().expect("array of entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["key"], "smith2021");
        assert_eq!(entries[0]["entry_type"], "article");
        assert_eq!(entries[0]["fields"]["year"], "2021");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn dump_unknown_page_is_rejected() {
        let root = temp_site("dump-bad");
        let config = resolve(&root, None).unwrap();

        let err = dump_value(&config, "about").unwrap_err();
        assert!(err.to_string().contains("unknown page 'about'"), "{err}");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn check_renders_without_writing() {
        let root = temp_site("check");
        let config = resolve(&root, None).unwrap();

        let summary = check_site(&config).unwrap();
        assert_eq!(summary.pages, Page::ALL.len());
        assert_eq!(summary.counts.bib_entries, 1);
        assert_eq!(summary.counts.publications, 1);
        assert_eq!(summary.counts.courses, 1);
        assert!(summary.templates.iter().any(|name| name == "base.html"));
        assert!(!root.join("index.html").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn resolve_rejects_missing_root() {
        let err = resolve(Path::new("/nonexistent/site/root"), None).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }
}
