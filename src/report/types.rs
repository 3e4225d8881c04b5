use crate::github::RepoRef;

/// Placeholder for table cells with nothing meaningful to show.
pub const SENTINEL: &str = "-";

/// One fork that survived the inclusion filter, ready to render.
#[derive(Debug, Clone)]
pub struct ForkRecord {
    /// The fork itself
    pub repo: RepoRef,
    /// Link target for the repository cell
    pub html_url: String,
    /// Fork description; empty when the owner never set one
    pub description: String,
    /// Stargazer count
    pub stars: u64,
    /// Commits on the fork's default branch that the root upstream lacks
    pub commits_ahead: u64,
    /// Commits the root upstream has that the fork lacks
    pub commits_behind: u64,
    /// Coarsened age of the newest commit ("3 days ago", "today", ...)
    pub last_commit: String,
    /// Open issue count; zero is normalized to `None` when the record is
    /// built, and `None` renders as the sentinel
    pub open_issues: Option<u64>,
    /// Latest release tag; `None` when nothing is published
    pub last_release: Option<String>,
    /// Ancestry from the root's direct fork down to this fork; its length
    /// sets the indentation depth in the report
    pub path: Vec<RepoRef>,
}

impl ForkRecord {
    /// `owner/name`, also the deduplication key.
    pub fn full_name(&self) -> String {
        self.repo.to_string()
    }

    /// Nesting depth below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// The root repository's own table row. It has no upstream to diverge from,
/// so it carries no ahead/behind counts.
#[derive(Debug, Clone)]
pub struct RootSummary {
    pub repo: RepoRef,
    pub html_url: String,
    pub stars: u64,
    pub last_commit: String,
    pub open_issues: Option<u64>,
    pub last_release: Option<String>,
}
