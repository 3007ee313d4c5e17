//! Story commands: `validate`, `lint`, `list`, `show`.
//!
//! Each command renders into a [`CommandReport`] instead of printing
//! directly, so output and exit status can be checked in tests.

use std::fmt::Write as _;

use storymap_core::{Error, Result};
use storymap_stories::{
    Collection, CollectionBuilder, StoryDetail, StoryMetadata, find_story, lint_store,
    missing_hero_alt,
};

use crate::config::StorymapConfig;

/// Rendered command output plus success flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandReport {
    fn ok(stdout: String) -> Self {
        Self {
            success: true,
            stdout,
            stderr: String::new(),
        }
    }

    fn failed(stderr: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr,
        }
    }

    /// Print both streams.
    pub fn emit(&self) {
        if !self.stdout.is_empty() {
            print!("{}", self.stdout);
        }
        if !self.stderr.is_empty() {
            eprint!("{}", self.stderr);
        }
    }
}

/// Release gate: build the collection (strict unless `strict` is false)
/// and require alt text for every published hero image.
pub fn validate(config: &StorymapConfig, strict: bool) -> Result<CommandReport> {
    let builder = CollectionBuilder::new(config.store()).with_options(config.build_options(strict));
    let collection = match builder.build() {
        Ok(collection) => collection,
        Err(err @ Error::StrictValidation { .. }) => {
            return Ok(CommandReport::failed(format!(
                "Frontmatter validation failed: {err}\n"
            )));
        }
        Err(err) => return Err(err),
    };

    let missing_alt = missing_hero_alt(&collection);
    if !missing_alt.is_empty() {
        let mut out = String::from("Content validation errors (accessibility):\n");
        for story in missing_alt {
            let _ = writeln!(
                out,
                " - Story {} has hero but missing heroAlt (accessibility requirement).",
                story.id
            );
        }
        return Ok(CommandReport::failed(out));
    }

    let mut report = CommandReport::ok(if strict {
        format!("Validated {} stories (strict).\n", collection.len())
    } else {
        format!("Validated {} stories (non-strict).\n", collection.len())
    });
    if !collection.is_clean() {
        report.stderr = invalid_summary(&collection);
    }
    Ok(report)
}

/// Run every lint rule. Fails when any error-severity finding exists.
pub fn lint(config: &StorymapConfig) -> Result<CommandReport> {
    let report = lint_store(
        config.store(),
        config.build_options(false),
        &config.asset_roots(),
    )?;

    let mut out = String::new();
    if report.is_empty() {
        out.push_str("Content Lint: No issues found.\n");
    } else {
        out.push_str("Content Lint Report:\n");
        for finding in &report.findings {
            let _ = writeln!(out, "{finding}");
        }
    }
    let _ = writeln!(
        out,
        "Checked {} documents. Errors: {}, warnings: {}",
        report.checked,
        report.error_count(),
        report.warning_count()
    );

    Ok(CommandReport {
        success: report.error_count() == 0,
        stdout: out,
        stderr: String::new(),
    })
}

/// Ordered story listing.
pub fn list(config: &StorymapConfig, json: bool) -> Result<CommandReport> {
    let collection = CollectionBuilder::new(config.store())
        .with_options(config.build_options(false))
        .build()?;

    let stdout = if json {
        let mut text = serde_json::to_string_pretty(&collection)?;
        text.push('\n');
        text
    } else {
        render_table(collection.stories())
    };

    let mut report = CommandReport::ok(stdout);
    if !collection.is_clean() {
        report.stderr = invalid_summary(&collection);
    }
    Ok(report)
}

/// One story's metadata and body.
pub fn show(config: &StorymapConfig, id: &str, json: bool) -> Result<CommandReport> {
    let detail = find_story(config.store(), id, config.build_options(false), None)?
        .ok_or_else(|| Error::not_found(id))?;

    let stdout = if json {
        let mut text = serde_json::to_string_pretty(&detail)?;
        text.push('\n');
        text
    } else {
        render_detail(&detail)
    };
    Ok(CommandReport::ok(stdout))
}

fn invalid_summary(collection: &Collection) -> String {
    let n = collection.errors().len();
    format!(
        "{n} document{} failed validation; run `storymap lint` for details.\n",
        if n == 1 { "" } else { "s" }
    )
}

fn render_table(stories: &[StoryMetadata]) -> String {
    if stories.is_empty() {
        return "No stories found.\n".to_string();
    }
    let id_width = stories.iter().map(|s| s.id.len()).max().unwrap_or(0).max(2);
    let mut out = String::new();
    let _ = writeln!(out, "{:<id_width$}  {:<9}  {:<10}  TITLE", "ID", "STATUS", "DATE");
    for story in stories {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<9}  {:<10}  {}",
            story.id,
            story.status.as_str(),
            story.date.as_deref().unwrap_or("-"),
            story.sort_label()
        );
    }
    out
}

fn render_detail(detail: &StoryDetail) -> String {
    let meta = &detail.metadata;
    let mut out = String::new();
    let _ = writeln!(out, "id:       {}", meta.id);
    let _ = writeln!(out, "title:    {}", meta.title);
    let _ = writeln!(out, "status:   {}", meta.status);
    let optional = [
        ("name", meta.name.clone()),
        ("location", meta.location.clone()),
        (
            "coords",
            meta.coordinates
                .map(|c| format!("[{}, {}]", c.longitude(), c.latitude())),
        ),
        ("date", meta.date.clone()),
        ("original", meta.date_original.clone()),
        ("tags", meta.tags.as_ref().map(|t| t.join(", "))),
        ("hero", meta.hero.clone()),
        ("heroAlt", meta.hero_alt.clone()),
        ("excerpt", meta.excerpt.clone()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{:<10}{value}", format!("{label}:"));
        }
    }
    out.push('\n');
    out.push_str(&detail.content);
    if !detail.content.ends_with('\n') {
        out.push('\n');
    }
    out
}
