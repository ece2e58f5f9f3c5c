//! Selecting and ordering bibliography entries for display.
//!
//! Two views come out of one bibliography: the publications page (finished
//! work, filtered by keyword) and the "current research" list on the projects
//! page (submissions under review).

use std::cmp::Reverse;

use serde::Serialize;
use tracing::debug;

use vitae_bibtex::{
    BibEntry, format_authors, format_date, month_number, parse_keywords, safe_year,
};
use vitae_shared::PublicationPolicy;

/// Venue fields, in order of preference.
const VENUE_FIELDS: [&str; 5] = [
    "journal",
    "booktitle",
    "howpublished",
    "organization",
    "institution",
];

/// One line of the publications page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    pub authors: String,
    pub title: String,
    /// `"Mar. 2020"` or `"2020"`.
    pub date: String,
    pub venue: String,
    pub volume: String,
    pub number: String,
    pub pages: String,
    pub editor: String,
    pub publisher: String,
    pub address: String,
    pub note: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub url: Option<String>,
}

/// A submission listed under "current research".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentResearch {
    pub title: String,
    /// Journal under review at, or a free-form note.
    pub status: String,
    pub url: Option<String>,
    pub year: String,
}

/// Filter and sort entries for the publications page.
pub fn build_publication_list(entries: &[BibEntry], policy: &PublicationPolicy) -> Vec<Publication> {
    let mut selected: Vec<&BibEntry> = entries
        .iter()
        .filter(|entry| is_listed_publication(entry, policy))
        .collect();

    selected.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    debug!(
        total = entries.len(),
        selected = selected.len(),
        "selected publications"
    );

    selected.into_iter().map(to_publication).collect()
}

/// Submissions carrying the under-review keyword, newest first.
pub fn build_current_research(
    entries: &[BibEntry],
    policy: &PublicationPolicy,
) -> Vec<CurrentResearch> {
    let under_review = policy.under_review_keyword.to_lowercase();

    let mut current: Vec<CurrentResearch> = entries
        .iter()
        .filter(|entry| parse_keywords(entry).contains(&under_review))
        .map(|entry| CurrentResearch {
            title: entry.get_or_empty("title").to_string(),
            status: entry
                .first_of(&["journal", "note"])
                .unwrap_or("Under review")
                .to_string(),
            url: entry.get("url").map(String::from),
            year: entry.get_or_empty("year").to_string(),
        })
        .collect();

    current.sort_by(|a, b| {
        safe_year(&b.year)
            .cmp(&safe_year(&a.year))
            .then_with(|| a.title.cmp(&b.title))
    });

    debug!(count = current.len(), "collected current research");
    current
}

/// Newest first, ties broken by title.
fn sort_key(entry: &BibEntry) -> (Reverse<u32>, Reverse<u32>, &str) {
    (
        Reverse(safe_year(entry.get_or_empty("year"))),
        Reverse(month_number(entry.get_or_empty("month"))),
        entry.get_or_empty("title"),
    )
}

/// Keyword and type rules for the publications page.
fn is_listed_publication(entry: &BibEntry, policy: &PublicationPolicy) -> bool {
    let keywords = parse_keywords(entry);
    let has_any = |wanted: &[String]| {
        wanted
            .iter()
            .any(|keyword| keywords.contains(&keyword.to_lowercase()))
    };

    if has_any(&policy.exclude_keywords) {
        return false;
    }

    let title = entry.get_or_empty("title").to_lowercase();
    if policy
        .exclude_title_terms
        .iter()
        .any(|term| title.contains(&term.to_lowercase()))
    {
        return false;
    }

    // Unpublished work belongs on the projects page, never here.
    has_any(&policy.include_keywords) && entry.entry_type != "unpublished"
}

fn to_publication(entry: &BibEntry) -> Publication {
    let field = |name: &str| entry.get_or_empty(name).to_string();

    Publication {
        authors: format_authors(entry.get_or_empty("author")),
        title: field("title"),
        date: format_date(entry),
        venue: entry.first_of(&VENUE_FIELDS).unwrap_or_default().to_string(),
        volume: field("volume"),
        number: field("number"),
        pages: field("pages"),
        editor: field("editor"),
        publisher: field("publisher"),
        address: field("address"),
        note: entry
            .first_of(&["note", "annote"])
            .unwrap_or_default()
            .to_string(),
        entry_type: entry.entry_type.clone(),
        url: entry.get("url").map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, year: &str, month: &str, title: &str, keywords: &str) -> BibEntry {
        BibEntry::new("article", key)
            .with_field("year", year)
            .with_field("month", month)
            .with_field("title", title)
            .with_field("keywords", keywords)
    }

    fn titles(pubs: &[Publication]) -> Vec<&str> {
        pubs.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn keeps_only_included_keywords() {
        let entries = vec![
            entry("a", "2020", "", "Reviewed", "peer_reviewed"),
            entry("b", "2020", "", "Blog post", "blog"),
            entry("c", "2020", "", "Report", "tecnical_report"),
            entry("d", "2020", "", "No keywords", ""),
        ];
        let pubs = build_publication_list(&entries, &PublicationPolicy::default());
        assert_eq!(titles(&pubs), vec!["Report", "Reviewed"]);
    }

    #[test]
    fn exclusions_beat_inclusions() {
        let entries = vec![
            entry("a", "2020", "", "Edited volume", "peer_reviewed, edited"),
            entry("b", "2020", "", "RItools: randomization inference", "open_source"),
            BibEntry::new("unpublished", "c")
                .with_field("title", "Draft")
                .with_field("keywords", "peer_reviewed"),
        ];
        assert!(build_publication_list(&entries, &PublicationPolicy::default()).is_empty());
    }

    #[test]
    fn sorted_by_year_then_month_then_title() {
        let entries = vec![
            entry("a", "2019", "dec", "Old", "essay"),
            entry("b", "2021", "feb", "Beta", "essay"),
            entry("c", "2021", "feb", "Alpha", "essay"),
            entry("d", "2021", "nov", "Late", "essay"),
            entry("e", "2021", "", "Undated", "essay"),
        ];
        let pubs = build_publication_list(&entries, &PublicationPolicy::default());
        assert_eq!(titles(&pubs), vec!["Late", "Alpha", "Beta", "Undated", "Old"]);
    }

    #[test]
    fn display_fields_are_formatted() {
        let entries = vec![
            BibEntry::new("inproceedings", "k")
                .with_field("author", "A. One and B. Two and C. Three")
                .with_field("title", "Talk")
                .with_field("booktitle", "Proceedings of Things")
                .with_field("year", "2018")
                .with_field("month", "9")
                .with_field("annote", "Best paper")
                .with_field("url", "https://example.org/talk")
                .with_field("keywords", "peer_reviewed"),
        ];
        let pubs = build_publication_list(&entries, &PublicationPolicy::default());
        let p = &pubs[0];
        assert_eq!(p.authors, "A. One, B. Two, and C. Three");
        assert_eq!(p.date, "Sept. 2018");
        assert_eq!(p.venue, "Proceedings of Things");
        assert_eq!(p.note, "Best paper");
        assert_eq!(p.entry_type, "inproceedings");
        assert_eq!(p.url.as_deref(), Some("https://example.org/talk"));
        assert_eq!(p.volume, "");
    }

    #[test]
    fn custom_policy_is_respected() {
        let policy = PublicationPolicy {
            include_keywords: vec!["Software".into()],
            exclude_keywords: vec![],
            exclude_title_terms: vec![],
            under_review_keyword: "submitted".into(),
        };
        let entries = vec![
            entry("a", "2020", "", "Package", "software"),
            entry("b", "2020", "", "Paper", "peer_reviewed"),
            entry("c", "2022", "", "Pending", "submitted"),
        ];
        assert_eq!(titles(&build_publication_list(&entries, &policy)), vec!["Package"]);

        let current = build_current_research(&entries, &policy);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].title, "Pending");
    }

    #[test]
    fn current_research_status_fallbacks_and_order() {
        let entries = vec![
            BibEntry::new("unpublished", "a")
                .with_field("title", "Zeta")
                .with_field("year", "2023")
                .with_field("journal", "Journal of Politics")
                .with_field("keywords", "under_review"),
            BibEntry::new("unpublished", "b")
                .with_field("title", "Alpha")
                .with_field("year", "2023")
                .with_field("note", "R&R")
                .with_field("keywords", "under_review"),
            BibEntry::new("unpublished", "c")
                .with_field("title", "Newest")
                .with_field("year", "2024")
                .with_field("keywords", "under_review"),
            entry("d", "2025", "", "Published", "peer_reviewed"),
        ];
        let current = build_current_research(&entries, &PublicationPolicy::default());
        let got: Vec<(&str, &str)> = current
            .iter()
            .map(|c| (c.title.as_str(), c.status.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Newest", "Under review"),
                ("Alpha", "R&R"),
                ("Zeta", "Journal of Politics"),
            ]
        );
    }

    #[test]
    fn publication_serializes_type_key() {
        let entries = vec![entry("a", "2020", "", "T", "essay")];
        let pubs = build_publication_list(&entries, &PublicationPolicy::default());
        let json = serde_json::to_value(&pubs[0]).unwrap();
        assert_eq!(json["type"], "article");
        assert!(json["url"].is_null());
    }
}
