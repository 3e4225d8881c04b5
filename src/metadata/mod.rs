pub mod time;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::github::types::{CommitEntry, CompareResponse, ReleaseLatest, RepoSummary};
use crate::github::{GitHubClient, GitHubError, RepoRef};
use crate::report::types::{RootSummary, SENTINEL};

/// Deduplicated commit set for one branch plus the newest commit timestamp
/// seen while paginating.
#[derive(Debug, Clone, Default)]
pub struct CommitSummary {
    pub unique_shas: HashSet<String>,
    pub most_recent: Option<DateTime<Utc>>,
}

impl CommitSummary {
    /// Number of distinct commits observed.
    pub fn count(&self) -> usize {
        self.unique_shas.len()
    }
}

/// Commits a fork's default branch leads and trails an upstream branch by.
#[derive(Debug, Clone, Copy)]
pub struct Divergence {
    pub ahead_by: u64,
    pub behind_by: u64,
}

/// Default branch name of a repository.
pub async fn default_branch(gh: &GitHubClient, repo: &RepoRef) -> Result<String, GitHubError> {
    let details: RepoSummary = gh.fetch(&gh.url(&format!("repos/{repo}"))).await?;
    Ok(details.default_branch)
}

/// Repository description, or the empty string when none is set.
pub async fn description(gh: &GitHubClient, repo: &RepoRef) -> Result<String, GitHubError> {
    let details: RepoSummary = gh.fetch(&gh.url(&format!("repos/{repo}"))).await?;
    Ok(details.description.unwrap_or_default())
}

pub async fn star_count(gh: &GitHubClient, repo: &RepoRef) -> Result<u64, GitHubError> {
    let details: RepoSummary = gh.fetch(&gh.url(&format!("repos/{repo}"))).await?;
    Ok(details.stargazers_count)
}

/// Paginate the full commit listing of the default branch, collapsing SHAs
/// into a set (a moving branch can hand the same commit out on two pages)
/// and tracking the newest timestamp.
#[instrument(skip(gh, repo), fields(repo = %repo))]
pub async fn commit_summary(
    gh: &GitHubClient,
    repo: &RepoRef,
) -> Result<CommitSummary, GitHubError> {
    let entries: Vec<CommitEntry> = gh
        .fetch_paginated(&gh.url(&format!("repos/{repo}/commits")))
        .await?;

    let mut summary = CommitSummary::default();
    for entry in entries {
        if let Some(timestamp) = entry.timestamp() {
            summary.most_recent = Some(match summary.most_recent {
                Some(current) => current.max(timestamp),
                None => timestamp,
            });
        }
        summary.unique_shas.insert(entry.sha);
    }
    debug!(commits = summary.count(), "commit listing summarized");
    Ok(summary)
}

/// Open issue count and latest release tag. A 404 from the release endpoint
/// means nothing has been published and comes back as `None`. A zero issue
/// count passes through untouched; display normalization is the caller's
/// business.
pub async fn open_issues_and_latest_release(
    gh: &GitHubClient,
    repo: &RepoRef,
) -> Result<(u64, Option<String>), GitHubError> {
    let details: RepoSummary = gh.fetch(&gh.url(&format!("repos/{repo}"))).await?;
    let release: Option<ReleaseLatest> = gh
        .fetch_optional(&gh.url(&format!("repos/{repo}/releases/latest")))
        .await?;
    Ok((details.open_issues_count, release.map(|r| r.tag_name)))
}

/// Ahead/behind divergence of `fork` relative to `upstream`, three-dot
/// comparing the two default branches. Both branches are resolved
/// independently; a fork may have renamed its own.
#[instrument(skip(gh, upstream, fork), fields(upstream = %upstream, fork = %fork))]
pub async fn divergence(
    gh: &GitHubClient,
    upstream: &RepoRef,
    fork: &RepoRef,
) -> Result<Divergence, GitHubError> {
    let base = default_branch(gh, upstream).await?;
    let head = default_branch(gh, fork).await?;
    let url = gh.url(&format!(
        "repos/{upstream}/compare/{base}...{}:{head}",
        fork.owner
    ));
    let compared: CompareResponse = gh.fetch(&url).await?;
    debug!(
        ahead = compared.ahead_by,
        behind = compared.behind_by,
        "compared against upstream"
    );
    Ok(Divergence {
        ahead_by: compared.ahead_by,
        behind_by: compared.behind_by,
    })
}

/// Everything the report's root row needs, in one pass.
pub async fn root_summary(
    gh: &GitHubClient,
    repo: &RepoRef,
    now: DateTime<Utc>,
) -> Result<RootSummary, GitHubError> {
    let details: RepoSummary = gh.fetch(&gh.url(&format!("repos/{repo}"))).await?;
    let commits = commit_summary(gh, repo).await?;
    let (open_issues, last_release) = open_issues_and_latest_release(gh, repo).await?;

    let last_commit = commits
        .most_recent
        .map(|timestamp| time::relative_age(timestamp, now))
        .unwrap_or_else(|| SENTINEL.to_string());

    Ok(RootSummary {
        repo: repo.clone(),
        html_url: details.html_url,
        stars: details.stargazers_count,
        last_commit,
        open_issues: if open_issues == 0 { None } else { Some(open_issues) },
        last_release,
    })
}
