mod config;
mod github;
mod metadata;
mod report;
#[cfg(test)]
mod test_utils;
mod walk;

use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// Fork Radar: CLI tool that walks a GitHub repository's fork network and
/// writes a static HTML report of every fork carrying commits its upstream
/// does not have.
#[derive(Parser, Debug)]
#[command(name = "fork-radar", version, about)]
struct Cli {
    /// Repository to scan, as owner/repo or a full GitHub URL
    ///
    /// Not required when a [repository] section is set in .fork-radar.toml.
    repository: Option<String>,

    /// Output file path for the HTML report (default: public/index.html)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How many levels of forks-of-forks to descend into
    #[arg(long)]
    max_depth: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let root = match cli.repository.as_deref() {
        Some(arg) => github::parse_repo_ref(arg)?,
        None => config.repo_ref().ok_or(
            "A repository is required. Usage: fork-radar <owner/repo> or set [repository] in .fork-radar.toml",
        )?,
    };

    let _main_span = info_span!("fork_scan", repo = %root).entered();

    let max_depth = cli.max_depth.unwrap_or(config.scan.max_depth);
    let output = cli.output.unwrap_or_else(|| config.output.path.clone());
    debug!(repo = %root, max_depth, output = %output.display(), "resolved scan parameters");

    let gh = github::GitHubClient::new(config.github_token());
    run(&gh, &root, max_depth, &output).await?;

    Ok(())
}

/// The full pipeline: root summary, fork walk, deduplication, rendering,
/// writing. Fails on the first request error; a partial report is never
/// written.
async fn run(
    gh: &github::GitHubClient,
    root: &github::RepoRef,
    max_depth: u32,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(repo = %root, "summarizing root repository");
    let summary = metadata::root_summary(gh, root, Utc::now()).await?;

    info!(max_depth, "walking fork tree");
    let records = walk::walk_tree(gh, root, max_depth).await?;
    info!(forks = records.len(), "fork walk complete");
    let records = walk::dedupe_records(records);

    let html = report::render(&summary, &records, Utc::now().date_naive());
    report::write_report(&html, output)?;
    info!(path = %output.display(), forks = records.len(), "report written");

    Ok(())
}
