use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::github::types::RepoSummary;
use crate::github::{GitHubClient, GitHubError, RepoRef};
use crate::metadata;
use crate::metadata::time::relative_age;
use crate::report::types::{ForkRecord, SENTINEL};

/// Walk the fork tree under `root`, depth-first in API listing order, keeping
/// every fork whose default branch has commits the root upstream lacks.
/// `max_depth` bounds recursion: 0 visits only direct forks, 1 adds their
/// forks, and so on.
#[instrument(skip(gh, root), fields(root = %root))]
pub async fn walk_tree(
    gh: &GitHubClient,
    root: &RepoRef,
    max_depth: u32,
) -> Result<Vec<ForkRecord>, GitHubError> {
    // One instant per walk, so every row is coarsened against the same "now".
    let now = Utc::now();
    walk(gh, root, root, 0, max_depth, &[], now).await
}

/// One level of the recursion: list `current`'s direct forks, emit a record
/// per fork that is ahead of the root upstream, and descend into each
/// emitted fork's own subtree. Returns its records; callers concatenate.
/// Boxed because async fns cannot recurse directly.
fn walk<'a>(
    gh: &'a GitHubClient,
    upstream: &'a RepoRef,
    current: &'a RepoRef,
    depth: u32,
    max_depth: u32,
    ancestry: &'a [RepoRef],
    now: DateTime<Utc>,
) -> Pin<Box<dyn Future<Output = Result<Vec<ForkRecord>, GitHubError>> + Send + 'a>> {
    Box::pin(async move {
        if depth > max_depth {
            return Ok(Vec::new());
        }

        let forks: Vec<RepoSummary> = gh
            .fetch_paginated(&gh.url(&format!("repos/{current}/forks")))
            .await?;
        debug!(parent = %current, depth, forks = forks.len(), "listed forks");

        let mut records = Vec::new();
        for fork in forks {
            let fork_ref = fork.repo_ref();
            let commits = metadata::commit_summary(gh, &fork_ref).await?;
            let drift = metadata::divergence(gh, upstream, &fork_ref).await?;

            // Nothing ahead of the root upstream: the fork is dropped and its
            // subtree never entered. This guard stays in front of both the
            // record and the recursion.
            if drift.ahead_by == 0 {
                debug!(fork = %fork_ref, behind = drift.behind_by, "no independent work, pruning subtree");
                continue;
            }

            let description = metadata::description(gh, &fork_ref).await?;
            let stars = metadata::star_count(gh, &fork_ref).await?;
            let (open_issues, last_release) =
                metadata::open_issues_and_latest_release(gh, &fork_ref).await?;
            let last_commit = commits
                .most_recent
                .map(|timestamp| relative_age(timestamp, now))
                .unwrap_or_else(|| SENTINEL.to_string());
            debug!(
                fork = %fork_ref,
                ahead = drift.ahead_by,
                behind = drift.behind_by,
                commits = commits.count(),
                stars,
                "recording fork"
            );

            let mut path = ancestry.to_vec();
            path.push(fork_ref.clone());

            records.push(ForkRecord {
                repo: fork_ref.clone(),
                html_url: fork.html_url,
                description,
                stars,
                commits_ahead: drift.ahead_by,
                commits_behind: drift.behind_by,
                last_commit,
                open_issues: if open_issues == 0 { None } else { Some(open_issues) },
                last_release,
                path: path.clone(),
            });

            let children = walk(gh, upstream, &fork_ref, depth + 1, max_depth, &path, now).await?;
            records.extend(children);
        }
        Ok(records)
    })
}

/// Keep the first record seen for each `owner/name`, preserving order. Every
/// fork has exactly one parent, so duplicates should be impossible; the
/// guard keeps the report well-formed if that assumption ever breaks.
pub fn dedupe_records(records: Vec<ForkRecord>) -> Vec<ForkRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.full_name()))
        .collect()
}
