//! End-to-end build of the fixture site.

use std::path::{Path, PathBuf};

use vitae_core::context::Page;
use vitae_core::pipeline::{GenerateConfig, SilentProgress, collect_site, generate_site};
use vitae_shared::{AppConfig, SitePaths};

fn fixture_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/site/data")
}

/// Copy the fixture data directory into a fresh site root.
fn fixture_site() -> tempfile::TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    let data = root.path().join("data");
    std::fs::create_dir_all(&data).unwrap();

    for entry in std::fs::read_dir(fixture_data_dir()).expect("read fixtures") {
        let path = entry.unwrap().path();
        std::fs::copy(&path, data.join(path.file_name().unwrap())).unwrap();
    }
    root
}

fn config_for(root: &Path, app: &AppConfig) -> GenerateConfig {
    let mut config = GenerateConfig::new(SitePaths::resolve(root, app), app.publications.clone());
    config.current_year = Some(2026);
    config
}

#[test]
fn collects_fixture_content() {
    let root = fixture_site();
    let data = collect_site(&config_for(root.path(), &AppConfig::default())).unwrap();

    assert_eq!(data.entries.len(), 8);
    assert_eq!(data.site.site_name, "Jane Smith");

    let titles: Vec<&str> = data.publications.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Randomization Inference for Network Experiments",
            "Why Design Comes First",
            "Measuring Turnout with Administrative Records",
        ]
    );
    assert_eq!(data.publications[0].authors, "Jane Smith, Rob Jones, and Ann Lee");
    assert_eq!(data.publications[0].date, "Sept. 2021");
    assert_eq!(data.publications[1].date, "Mar. 2020");
    assert_eq!(data.publications[2].venue, "Center for Survey Methods");

    let research: Vec<(&str, &str)> = data
        .current_research
        .iter()
        .map(|c| (c.title.as_str(), c.status.as_str()))
        .collect();
    assert_eq!(
        research,
        vec![
            (
                "Interference in Cluster-Randomized Trials",
                "American Political Science Review"
            ),
            ("A Working Paper", "Revise and resubmit"),
        ]
    );

    assert_eq!(data.projects.len(), 3);
    assert_eq!(data.courses.len(), 2);
    assert!(data.bio_html.starts_with("<p>Jane Smith is an associate professor"));
    assert!(data.bio_html.contains(r#"<a href="https://example.edu">Example University</a>"#));
}

#[test]
fn writes_all_pages_with_expected_content() {
    let root = fixture_site();
    let result = generate_site(&config_for(root.path(), &AppConfig::default()), &SilentProgress)
        .unwrap();

    assert_eq!(result.written.len(), Page::ALL.len());
    for page in Page::ALL {
        let html = std::fs::read_to_string(root.path().join(page.output_file())).unwrap();
        assert!(!html.is_empty());
        assert!(html.contains("Jane Smith"), "{page}");
        assert!(html.contains("smith_cv.pdf"), "{page}: vita link");
    }

    let index = std::fs::read_to_string(root.path().join("index.html")).unwrap();
    assert!(index.contains("<p>Her current work develops design-based methods"));

    let pubs = std::fs::read_to_string(root.path().join("publications.html")).unwrap();
    assert!(pubs.contains("Randomization Inference for Network Experiments"));
    assert!(pubs.contains("Why Design Comes First"));
    assert!(!pubs.contains("Handbook of Field Experiments"));
    assert!(!pubs.contains("A Conference Talk"));
    assert!(!pubs.contains("A Working Paper"));

    let projects = std::fs::read_to_string(root.path().join("projects.html")).unwrap();
    assert!(projects.contains("Interference in Cluster-Randomized Trials"));
    assert!(projects.contains("Network experiments"));
    assert!(projects.contains("Turnout and administrative data"));
    assert!(projects.contains("RItools"));

    let teaching = std::fs::read_to_string(root.path().join("teaching.html")).unwrap();
    assert!(teaching.contains("Research Design"));
    assert!(teaching.contains("PS 532"));
}

#[test]
fn output_dir_and_template_overrides_from_config() {
    let root = fixture_site();
    let templates = root.path().join("theme");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(
        templates.join("base.html"),
        "<html><title>{{ title }}</title>{% block content %}{% endblock content %}</html>",
    )
    .unwrap();

    let app: AppConfig = toml::from_str(
        r#"
[paths]
templates_dir = "theme"
output_dir = "public"

[publications]
include_keywords = ["presentation"]
"#,
    )
    .unwrap();

    let result = generate_site(&config_for(root.path(), &app), &SilentProgress).unwrap();
    assert_eq!(result.counts.publications, 1);

    let pubs = std::fs::read_to_string(root.path().join("public/publications.html")).unwrap();
    assert!(pubs.starts_with("<html><title>Publications</title>"));
    assert!(pubs.contains("A Conference Talk"));
    assert!(!root.path().join("publications.html").exists());
}
