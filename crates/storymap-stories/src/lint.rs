//! Content lint: rule checks over a built collection.
//!
//! Linting never fails on invalid documents. Every problem becomes a
//! [`Finding`], and the caller decides what to do with the
//! [`LintReport`] (the CLI exits non-zero when it holds any errors).
//!
//! | kind                    | severity | when                                               |
//! |-------------------------|----------|----------------------------------------------------|
//! | `frontmatter`           | error    | one per schema issue of an invalid document        |
//! | `missing-hero-alt`      | error    | published story with `hero` but no `heroAlt`       |
//! | `missing-hero-file`     | error    | `hero` names a local file that does not exist      |
//! | `missing-image-ref`     | error    | body image names a local file that does not exist  |
//! | `missing-coordinates`   | warn     | no map pin                                         |
//! | `coordinates-out-of-range` | warn  | longitude or latitude outside the globe            |
//! | `missing-hero`          | warn     | no hero image                                      |
//! | `unrecognized-date`     | warn     | raw date kept in `dateOriginal` but no canonical   |
//! | `legacy-path`           | warn     | `/static/img/<id>/` instead of `/stories/<id>/`    |
//! | `draft-status`          | info     | story is a draft                                   |

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use storymap_content::{FrontmatterParser, MetadataDecoder, YamlDecoder, image_references};
use storymap_core::Result;

use crate::collection::{BuildOptions, Collection, CollectionBuilder};
use crate::schema::StoryMetadata;
use crate::store::ContentStore;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    Frontmatter,
    MissingHeroAlt,
    MissingHeroFile,
    MissingImageRef,
    MissingCoordinates,
    CoordinatesOutOfRange,
    MissingHero,
    UnrecognizedDate,
    LegacyPath,
    DraftStatus,
}

impl FindingKind {
    /// Kebab-case name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Frontmatter => "frontmatter",
            FindingKind::MissingHeroAlt => "missing-hero-alt",
            FindingKind::MissingHeroFile => "missing-hero-file",
            FindingKind::MissingImageRef => "missing-image-ref",
            FindingKind::MissingCoordinates => "missing-coordinates",
            FindingKind::CoordinatesOutOfRange => "coordinates-out-of-range",
            FindingKind::MissingHero => "missing-hero",
            FindingKind::UnrecognizedDate => "unrecognized-date",
            FindingKind::LegacyPath => "legacy-path",
            FindingKind::DraftStatus => "draft-status",
        }
    }

    /// Severity this kind is always reported at.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::Frontmatter
            | FindingKind::MissingHeroAlt
            | FindingKind::MissingHeroFile
            | FindingKind::MissingImageRef => Severity::Error,
            FindingKind::DraftStatus => Severity::Info,
            _ => Severity::Warn,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lint result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Storage key of the document.
    pub key: String,
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    /// Finding at the kind's standard severity.
    pub fn new(key: impl Into<String>, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity.as_str().to_uppercase(),
            self.key,
            self.kind,
            self.message
        )
    }
}

/// All findings from one lint run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LintReport {
    /// Number of documents examined.
    pub checked: usize,
    pub findings: Vec<Finding>,
}

impl LintReport {
    /// Number of error findings.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    /// Number of findings at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// True when there are no findings at all.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings for one document.
    pub fn for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.key == key)
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Where referenced images are looked up.
///
/// A reference such as `/stories/ana/hero.jpg` is resolved against each
/// root in turn (`<base>/static/stories/ana/hero.jpg`,
/// `<base>/public/stories/ana/hero.jpg`). References that already start
/// with a root name (`/static/img/ana.jpg`) are resolved against the base
/// directory directly. Remote `http(s)://` URLs always count as present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoots {
    base_dir: PathBuf,
    roots: Vec<String>,
}

impl Default for AssetRoots {
    fn default() -> Self {
        Self::new(".", ["static", "public"])
    }
}

impl AssetRoots {
    /// Asset roots under `base_dir`.
    pub fn new<I, S>(base_dir: impl Into<PathBuf>, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_dir: base_dir.into(),
            roots: roots
                .into_iter()
                .map(|r| r.into().trim_matches('/').to_string())
                .collect(),
        }
    }

    /// True for remote references that are never checked.
    pub fn is_remote(reference: &str) -> bool {
        let lower = reference.trim().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Candidate filesystem paths for a local reference.
    pub fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let cleaned = reference.trim().trim_start_matches('/');
        let under_root = self
            .roots
            .iter()
            .any(|root| cleaned.starts_with(&format!("{root}/")));
        if under_root {
            vec![self.base_dir.join(cleaned)]
        } else {
            self.roots
                .iter()
                .map(|root| self.base_dir.join(root).join(cleaned))
                .collect()
        }
    }

    /// True when `reference` is remote or exists under some root.
    pub fn exists(&self, reference: &str) -> bool {
        if Self::is_remote(reference) {
            return true;
        }
        if reference.trim().is_empty() {
            return false;
        }
        self.candidates(reference).iter().any(|p| p.exists())
    }
}

/// Published stories whose hero image has no alt text.
///
/// The release gate fails on these even though they pass the schema.
pub fn missing_hero_alt(collection: &Collection) -> Vec<&StoryMetadata> {
    collection
        .published()
        .filter(|s| needs_hero_alt(s))
        .collect()
}

fn needs_hero_alt(story: &StoryMetadata) -> bool {
    let has_hero = story.hero.as_deref().is_some_and(|h| !h.trim().is_empty());
    let has_alt = story.hero_alt.as_deref().is_some_and(|a| !a.trim().is_empty());
    has_hero && !has_alt
}

/// Build a lenient collection from `store` and lint it.
pub fn lint_store<S: ContentStore>(
    store: S,
    options: BuildOptions,
    assets: &AssetRoots,
) -> Result<LintReport> {
    lint_store_with(store, YamlDecoder, options, assets)
}

/// [`lint_store`] for stores whose metadata blocks use another format.
pub fn lint_store_with<S: ContentStore, D: MetadataDecoder + Clone>(
    store: S,
    decoder: D,
    options: BuildOptions,
    assets: &AssetRoots,
) -> Result<LintReport> {
    let collection = CollectionBuilder::new(&store)
        .with_decoder(decoder.clone())
        .with_options(BuildOptions {
            strict: false,
            ..options
        })
        .build()?;
    lint_collection_with(&store, decoder, &collection, assets)
}

/// Lint an already-built collection. `store` is re-read for document
/// bodies so image references can be checked.
pub fn lint_collection<S: ContentStore>(
    store: S,
    collection: &Collection,
    assets: &AssetRoots,
) -> Result<LintReport> {
    lint_collection_with(store, YamlDecoder, collection, assets)
}

/// [`lint_collection`] for stores whose metadata blocks use another format.
pub fn lint_collection_with<S: ContentStore, D: MetadataDecoder>(
    store: S,
    decoder: D,
    collection: &Collection,
    assets: &AssetRoots,
) -> Result<LintReport> {
    let parser = FrontmatterParser::with_decoder(decoder);
    let mut findings = Vec::new();

    for failure in collection.errors() {
        let key = failure.key.clone().unwrap_or_else(|| failure.id.clone());
        for issue in &failure.issues {
            findings.push(Finding::new(&key, FindingKind::Frontmatter, issue.to_string()));
        }
    }

    for story in collection.stories() {
        let Some(key) = collection.source_key(&story.id) else {
            continue;
        };
        let raw = store.read(key)?;
        let body = parser.parse(&raw).content;
        lint_story(key, story, &raw, &body, assets, &mut findings);
    }

    // Keep each document's findings together, in document order.
    findings.sort_by(|a, b| a.key.cmp(&b.key));

    let report = LintReport {
        checked: collection.len() + collection.errors().len(),
        findings,
    };
    log::info!(
        "Linted {} documents: {} errors, {} warnings",
        report.checked,
        report.error_count(),
        report.warning_count()
    );
    Ok(report)
}

fn lint_story(
    key: &str,
    story: &StoryMetadata,
    raw: &str,
    body: &str,
    assets: &AssetRoots,
    findings: &mut Vec<Finding>,
) {
    match &story.coordinates {
        None => findings.push(Finding::new(
            key,
            FindingKind::MissingCoordinates,
            "No coordinates set (map pin disabled).",
        )),
        Some(c) if !c.in_range() => findings.push(Finding::new(
            key,
            FindingKind::CoordinatesOutOfRange,
            format!(
                "Coordinates [{}, {}] are not a valid [longitude, latitude] pair.",
                c.longitude(),
                c.latitude()
            ),
        )),
        Some(_) => {}
    }

    if story.date.is_none() {
        if let Some(original) = &story.date_original {
            findings.push(Finding::new(
                key,
                FindingKind::UnrecognizedDate,
                format!("Date '{original}' is not a recognized date; story is treated as undated."),
            ));
        }
    }

    match story.hero.as_deref().filter(|h| !h.trim().is_empty()) {
        None => findings.push(Finding::new(key, FindingKind::MissingHero, "No hero image set.")),
        Some(hero) => {
            if !assets.exists(hero) {
                findings.push(Finding::new(
                    key,
                    FindingKind::MissingHeroFile,
                    format!("Hero image not found: {hero}"),
                ));
            }
        }
    }

    if !story.is_draft() && needs_hero_alt(story) {
        findings.push(Finding::new(
            key,
            FindingKind::MissingHeroAlt,
            "Hero image is missing heroAlt text (accessibility requirement).",
        ));
    }

    for reference in image_references(body) {
        if !assets.exists(&reference) {
            findings.push(Finding::new(
                key,
                FindingKind::MissingImageRef,
                format!("Image not found: {reference}"),
            ));
        }
    }

    if !story.id.is_empty() {
        let legacy = format!("/static/img/{}/", story.id);
        if raw.contains(&legacy) {
            findings.push(Finding::new(
                key,
                FindingKind::LegacyPath,
                format!("Replace '{legacy}' with '/stories/{}/'.", story.id),
            ));
        }
    }

    if story.is_draft() {
        findings.push(Finding::new(key, FindingKind::DraftStatus, "Story marked as draft."));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryContentStore;
    use tempfile::TempDir;

    fn assets() -> (TempDir, AssetRoots) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public/stories/ana")).unwrap();
        std::fs::write(dir.path().join("public/stories/ana/hero.jpg"), b"jpg").unwrap();
        std::fs::create_dir_all(dir.path().join("static/img")).unwrap();
        std::fs::write(dir.path().join("static/img/map.png"), b"png").unwrap();
        let roots = AssetRoots::new(dir.path(), ["static", "public"]);
        (dir, roots)
    }

    fn kinds(report: &LintReport, key: &str) -> Vec<FindingKind> {
        report.for_key(key).map(|f| f.kind).collect()
    }

    // ------------------------------------------------------------------------
    // AssetRoots
    // ------------------------------------------------------------------------

    #[test]
    fn test_asset_lookup_under_roots() {
        let (_dir, roots) = assets();
        assert!(roots.exists("/stories/ana/hero.jpg"));
        assert!(roots.exists("stories/ana/hero.jpg"));
        assert!(roots.exists("/static/img/map.png"));
        assert!(!roots.exists("/stories/ana/missing.jpg"));
        assert!(!roots.exists(""));
    }

    #[test]
    fn test_remote_assets_skipped() {
        let roots = AssetRoots::new("/nonexistent", ["static"]);
        assert!(roots.exists("https://example.org/a.jpg"));
        assert!(roots.exists("HTTP://example.org/a.jpg"));
    }

    #[test]
    fn test_candidates() {
        let roots = AssetRoots::new("/site", ["static", "public"]);
        assert_eq!(
            roots.candidates("/a/b.png"),
            vec![PathBuf::from("/site/static/a/b.png"), PathBuf::from("/site/public/a/b.png")]
        );
        assert_eq!(roots.candidates("/public/x.png"), vec![PathBuf::from("/site/public/x.png")]);
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    #[test]
    fn test_clean_story_has_no_findings() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new().with_document(
            "ana.mdx",
            "---\ntitle: Ana\ncoordinates: [-87.6, 41.8]\nhero: /stories/ana/hero.jpg\nheroAlt: Ana at the market\n---\n\n![Map](/static/img/map.png)\n",
        );
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert!(report.is_empty(), "{:?}", report.findings);
        assert_eq!(report.checked, 1);
    }

    #[test]
    fn test_frontmatter_errors_one_per_issue() {
        let (_dir, roots) = assets();
        let store =
            MemoryContentStore::new().with_document("bad.mdx", "---\nstatus: archived\n---\n");
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert_eq!(kinds(&report, "bad.mdx"), vec![FindingKind::Frontmatter; 2]);
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_soft_warnings_and_info() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new().with_document(
            "ben.mdx",
            "---\ntitle: Ben\nstatus: draft\ndate: sometime\n---\nBody",
        );
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert_eq!(
            kinds(&report, "ben.mdx"),
            vec![
                FindingKind::MissingCoordinates,
                FindingKind::UnrecognizedDate,
                FindingKind::MissingHero,
                FindingKind::DraftStatus,
            ]
        );
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 3);
        assert_eq!(report.count(Severity::Info), 1);
    }

    #[test]
    fn test_hero_alt_only_for_published() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new()
            .with_document(
                "ana.mdx",
                "---\ntitle: Ana\ncoordinates: [0, 0]\nhero: /stories/ana/hero.jpg\n---\n",
            )
            .with_document(
                "cy.mdx",
                "---\ntitle: Cy\ncoordinates: [0, 0]\nhero: /stories/ana/hero.jpg\nstatus: draft\n---\n",
            );
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert_eq!(kinds(&report, "ana.mdx"), vec![FindingKind::MissingHeroAlt]);
        assert_eq!(kinds(&report, "cy.mdx"), vec![FindingKind::DraftStatus]);
    }

    #[test]
    fn test_missing_files_and_legacy_paths() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new().with_document(
            "dee.mdx",
            concat!(
                "---\ntitle: Dee\ncoordinates: [0, 0]\nhero: /static/img/dee/hero.jpg\nheroAlt: Dee\n---\n",
                "<Figure src=\"/static/img/dee/one.jpg\" caption=\"One\" />\n\n",
                "<img src={'https://cdn.example.org/two.jpg'} />\n\n",
                "![three](/stories/dee/three.jpg)\n",
            ),
        );
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert_eq!(
            kinds(&report, "dee.mdx"),
            vec![
                FindingKind::MissingHeroFile,
                FindingKind::MissingImageRef,
                FindingKind::MissingImageRef,
                FindingKind::LegacyPath,
            ]
        );
        let legacy = report.of_kind(FindingKind::LegacyPath).next().unwrap();
        assert!(legacy.message.contains("/stories/dee/"));
    }

    #[test]
    fn test_lint_with_json_decoder() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new().with_document(
            "ana.mdx",
            concat!(
                "---\n{\"title\": \"Ana\", \"coordinates\": [0, 0], ",
                "\"hero\": \"/stories/ana/hero.jpg\", \"heroAlt\": \"Ana\"}\n---\n\n",
                "![gone](/stories/ana/gone.jpg)\n",
            ),
        );
        let report =
            lint_store_with(&store, storymap_content::JsonDecoder, BuildOptions::default(), &roots)
                .unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(kinds(&report, "ana.mdx"), vec![FindingKind::MissingImageRef]);
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let (_dir, roots) = assets();
        let store = MemoryContentStore::new().with_document(
            "far.mdx",
            "---\ntitle: Far\ncoordinates: [41.8, -187.6]\nhero: https://x.org/h.jpg\nheroAlt: h\n---\n",
        );
        let report = lint_store(&store, BuildOptions::default(), &roots).unwrap();
        assert_eq!(kinds(&report, "far.mdx"), vec![FindingKind::CoordinatesOutOfRange]);
    }

    #[test]
    fn test_missing_hero_alt_helper() {
        let store = MemoryContentStore::new()
            .with_document("a.mdx", "---\ntitle: A\nhero: a.jpg\n---\n")
            .with_document("b.mdx", "---\ntitle: B\nhero: b.jpg\nheroAlt: ' '\n---\n")
            .with_document("c.mdx", "---\ntitle: C\nhero: c.jpg\nheroAlt: C\n---\n");
        let collection = CollectionBuilder::new(&store).build().unwrap();
        let ids: Vec<&str> = missing_hero_alt(&collection).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::new("a.mdx", FindingKind::MissingHero, "No hero image set.");
        assert_eq!(finding.to_string(), "[WARN] a.mdx missing-hero: No hero image set.");
    }
}
