#![cfg(test)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::github::{GitHubClient, GitHubError, Page, Transport};

/// Base URL canned fixtures live under. Never dialed.
pub const API_BASE: &str = "https://gh.test";

enum Canned {
    Page { body: Value, next: Option<String> },
    Status(u16),
}

/// In-memory [`Transport`]: canned JSON pages keyed by URL, plus a request
/// log for assertions. URLs with no fixture come back as 404s.
pub struct FakeTransport {
    canned: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            canned: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Register a 200 response with no continuation link.
    pub fn json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.canned.insert(url.into(), Canned::Page { body, next: None });
        self
    }

    /// Register a 200 response that chains to `next`.
    pub fn page(mut self, url: impl Into<String>, body: Value, next: impl Into<String>) -> Self {
        self.canned.insert(
            url.into(),
            Canned::Page {
                body,
                next: Some(next.into()),
            },
        );
        self
    }

    /// Register a bare status code.
    pub fn status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.canned.insert(url.into(), Canned::Status(status));
        self
    }

    /// Wrap the transport in a client rooted at [`API_BASE`], handing back a
    /// second handle for request-log assertions.
    pub fn into_client(self) -> (GitHubClient, Arc<FakeTransport>) {
        let transport = Arc::new(self);
        let gh = GitHubClient::with_transport(transport.clone(), API_BASE);
        (gh, transport)
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Page, GitHubError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.canned.get(url) {
            Some(Canned::Page { body, next }) => Ok(Page {
                body: body.clone(),
                next: next.clone(),
            }),
            Some(Canned::Status(status)) => Err(GitHubError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(GitHubError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

pub fn repo_url(full_name: &str) -> String {
    format!("{API_BASE}/repos/{full_name}")
}

pub fn forks_url(full_name: &str) -> String {
    format!("{API_BASE}/repos/{full_name}/forks")
}

pub fn commits_url(full_name: &str) -> String {
    format!("{API_BASE}/repos/{full_name}/commits")
}

pub fn release_url(full_name: &str) -> String {
    format!("{API_BASE}/repos/{full_name}/releases/latest")
}

pub fn compare_url(upstream: &str, base: &str, fork_owner: &str, head: &str) -> String {
    format!("{API_BASE}/repos/{upstream}/compare/{base}...{fork_owner}:{head}")
}

/// Repository fixture shaped like a live `/repos/{owner}/{repo}` document.
pub struct RepoFixture {
    owner: String,
    name: String,
    default_branch: String,
    description: Option<String>,
    stars: u64,
    open_issues: u64,
}

impl RepoFixture {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            default_branch: "main".to_string(),
            description: None,
            stars: 0,
            open_issues: 0,
        }
    }

    pub fn branch(mut self, name: &str) -> Self {
        self.default_branch = name.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn stars(mut self, count: u64) -> Self {
        self.stars = count;
        self
    }

    pub fn open_issues(mut self, count: u64) -> Self {
        self.open_issues = count;
        self
    }

    pub fn json(&self) -> Value {
        json!({
            "name": self.name,
            "full_name": format!("{}/{}", self.owner, self.name),
            "owner": { "login": self.owner },
            "html_url": format!("https://github.com/{}/{}", self.owner, self.name),
            "default_branch": self.default_branch,
            "description": self.description,
            "stargazers_count": self.stars,
            "open_issues_count": self.open_issues,
        })
    }
}

/// One commit-listing entry with committer and author dated `date` (RFC 3339).
pub fn commit_json(sha: &str, date: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "author": { "name": "dev", "date": date },
            "committer": { "name": "dev", "date": date },
        }
    })
}

pub fn compare_json(ahead: u64, behind: u64) -> Value {
    json!({
        "ahead_by": ahead,
        "behind_by": behind,
        "status": if ahead > 0 { "ahead" } else { "behind" },
    })
}

pub fn release_json(tag: &str) -> Value {
    json!({ "tag_name": tag, "name": tag })
}
