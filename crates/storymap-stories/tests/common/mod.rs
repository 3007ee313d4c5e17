//! Shared fixtures for story pipeline integration tests.

use std::path::Path;

use storymap_stories::FsContentStore;
use tempfile::TempDir;

/// A temporary story directory.
pub struct StoryDir {
    pub dir: TempDir,
}

impl StoryDir {
    /// Empty story directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write a story document with the given metadata lines and body.
    pub fn story(self, file: &str, metadata: &str, body: &str) -> Self {
        let raw = format!("---\n{metadata}\n---\n{body}");
        std::fs::write(self.dir.path().join(file), raw).expect("Failed to write story");
        self
    }

    /// Write a file verbatim.
    pub fn raw(self, file: &str, raw: &str) -> Self {
        std::fs::write(self.dir.path().join(file), raw).expect("Failed to write file");
        self
    }

    /// Write raw bytes, for documents in the wrong encoding.
    pub fn bytes(self, file: &str, bytes: &[u8]) -> Self {
        std::fs::write(self.dir.path().join(file), bytes).expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> FsContentStore {
        FsContentStore::new(self.path())
    }
}

impl Default for StoryDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Three stories where the middle one is missing its title.
pub fn one_broken() -> StoryDir {
    StoryDir::new()
        .story("ana.mdx", "title: Ana\ndate: 2024-01-01", "Ana's story.")
        .story("ben.mdx", "name: Ben\ndate: 2024-02-01", "Ben's story.")
        .story("cy.mdx", "title: Cy\ndate: 2024-03-01", "Cy's story.")
}

/// The A/B/C ordering fixture: two published stories and a newer draft.
pub fn status_and_dates() -> StoryDir {
    StoryDir::new()
        .story("a.mdx", "title: A\nstatus: published\ndate: 2024-01-01", "")
        .story("b.mdx", "title: B\nstatus: published\ndate: 2024-06-01", "")
        .story("c.mdx", "title: C\nstatus: draft\ndate: 2024-12-01", "")
}
