use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Identifies one repository, root or fork alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository document as returned by `GET /repos/{owner}/{repo}` and, item
/// by item, by the paginated fork listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub owner: RepoOwner,
    pub html_url: String,
    pub default_branch: String,
    /// Null in the API when the owner never set one.
    pub description: Option<String>,
    pub stargazers_count: u64,
    pub open_issues_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

impl RepoSummary {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.login.clone(), self.name.clone())
    }
}

/// One entry of the paginated commit listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: Option<CommitSignature>,
    pub committer: Option<CommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub date: Option<DateTime<Utc>>,
}

impl CommitEntry {
    /// Committer date when present, author date otherwise. GitHub omits the
    /// committer signature on some imported commits.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.commit
            .committer
            .as_ref()
            .and_then(|sig| sig.date)
            .or_else(|| self.commit.author.as_ref().and_then(|sig| sig.date))
    }
}

/// Ahead/behind counts from the three-dot compare endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompareResponse {
    pub ahead_by: u64,
    pub behind_by: u64,
}

/// Response of `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseLatest {
    pub tag_name: String,
}
