pub mod types;

pub use types::{ForkRecord, RootSummary};

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, instrument};

use types::SENTINEL;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.4em 0.8em; border-bottom: 1px solid #ddd; }
tr.description td { color: #666; font-size: 0.9em; }
.stars { color: #b8860b; }
footer { margin-top: 2em; color: #888; font-size: 0.8em; }
";

/// Render the fork-activity table as one self-contained HTML document: a
/// header row, one row for the root, then a row pair per fork in walk order.
pub fn render(root: &RootSummary, forks: &[ForkRecord], generated: NaiveDate) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Fork activity for {}</title>\n",
        escape_html(&root.repo.to_string())
    ));
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!(
        "<h1>Fork activity for {}</h1>\n",
        escape_html(&root.repo.to_string())
    ));

    html.push_str("<table>\n");
    html.push_str(
        "<tr><th>Repository</th><th>Commits Ahead</th><th>Commits Behind</th>\
         <th>Last Commit</th><th>Open Issues</th><th>Last Release</th></tr>\n",
    );

    // The root has no upstream, so ahead/behind stay sentinels.
    html.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        repo_link(&root.repo.to_string(), &root.html_url, root.stars),
        SENTINEL,
        SENTINEL,
        escape_html(&root.last_commit),
        count_cell(root.open_issues),
        text_cell(root.last_release.as_deref()),
    ));

    for fork in forks {
        push_fork_rows(&mut html, fork);
    }

    html.push_str("</table>\n");
    html.push_str(&format!(
        "<footer>Generated on {} by fork-radar</footer>\n",
        generated.format("%Y-%m-%d")
    ));
    html.push_str("</body>\n</html>\n");
    html
}

/// One fork renders as two rows: the data row, indented by tree depth, and a
/// full-width description row beneath it, emitted even when the description
/// is empty.
fn push_fork_rows(html: &mut String, fork: &ForkRecord) {
    let indent = 1.5 * fork.depth() as f64;
    html.push_str(&format!(
        "<tr><td style=\"padding-left: {}em\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        indent,
        repo_link(&fork.full_name(), &fork.html_url, fork.stars),
        fork.commits_ahead,
        fork.commits_behind,
        escape_html(&fork.last_commit),
        count_cell(fork.open_issues),
        text_cell(fork.last_release.as_deref()),
    ));
    html.push_str(&format!(
        "<tr class=\"description\"><td colspan=\"6\" style=\"padding-left: {}em\">{}</td></tr>\n",
        indent,
        escape_html(&fork.description),
    ));
}

/// Repository link, with a star badge once the count clears one.
fn repo_link(name: &str, url: &str, stars: u64) -> String {
    let mut cell = format!(
        "<a href=\"{}\">{}</a>",
        escape_html(url),
        escape_html(name)
    );
    if stars > 1 {
        cell.push_str(&format!(" <span class=\"stars\">★ {stars}</span>"));
    }
    cell
}

fn count_cell(value: Option<u64>) -> String {
    value
        .map(|count| count.to_string())
        .unwrap_or_else(|| SENTINEL.to_string())
}

fn text_cell(value: Option<&str>) -> String {
    value
        .map(escape_html)
        .unwrap_or_else(|| SENTINEL.to_string())
}

/// Minimal HTML escaping for text and attribute positions.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write the rendered document, creating missing parent directories first.
#[instrument(skip(html))]
pub fn write_report(html: &str, path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!(path = %path.display(), bytes = html.len(), "writing report");
    fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RepoRef;

    fn sample_root() -> RootSummary {
        RootSummary {
            repo: RepoRef::new("alice", "widget"),
            html_url: "https://github.com/alice/widget".to_string(),
            stars: 5,
            last_commit: "2 months ago".to_string(),
            open_issues: Some(7),
            last_release: Some("v1.2.0".to_string()),
        }
    }

    fn sample_fork(owner: &str, path: Vec<RepoRef>) -> ForkRecord {
        ForkRecord {
            repo: RepoRef::new(owner, "widget"),
            html_url: format!("https://github.com/{owner}/widget"),
            description: "adds a frobnicator".to_string(),
            stars: 0,
            commits_ahead: 3,
            commits_behind: 1,
            last_commit: "10 days ago".to_string(),
            open_issues: Some(2),
            last_release: None,
            path,
        }
    }

    fn generated() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_render_header_and_root_row() {
        let html = render(&sample_root(), &[], generated());

        assert!(html.contains("<th>Repository</th><th>Commits Ahead</th><th>Commits Behind</th>"));
        assert!(html.contains(r#"<a href="https://github.com/alice/widget">alice/widget</a>"#));
        // Root drift cells are sentinels; its metadata cells are not.
        assert!(html.contains("<td>-</td><td>-</td><td>2 months ago</td><td>7</td><td>v1.2.0</td>"));
    }

    #[test]
    fn test_missing_metadata_renders_sentinels() {
        let fork = ForkRecord {
            open_issues: None,
            last_release: None,
            ..sample_fork("bob", vec![RepoRef::new("bob", "widget")])
        };
        let html = render(&sample_root(), &[fork], generated());

        assert!(html.contains("<td>3</td><td>1</td><td>10 days ago</td><td>-</td><td>-</td></tr>"));
    }

    #[test]
    fn test_star_badge_needs_more_than_one_star() {
        let modest = ForkRecord {
            stars: 1,
            ..sample_fork("bob", vec![RepoRef::new("bob", "widget")])
        };
        let noticed = ForkRecord {
            stars: 2,
            ..sample_fork("carol", vec![RepoRef::new("carol", "widget")])
        };
        let html = render(&sample_root(), &[modest, noticed], generated());

        assert!(!html.contains("★ 1"));
        assert!(html.contains(r#"<span class="stars">★ 2</span>"#));
        // Root has 5 stars and gets a badge of its own.
        assert!(html.contains("★ 5"));
    }

    #[test]
    fn test_indentation_follows_depth() {
        let direct = sample_fork("bob", vec![RepoRef::new("bob", "widget")]);
        let nested = sample_fork(
            "carol",
            vec![RepoRef::new("bob", "widget"), RepoRef::new("carol", "widget")],
        );
        let html = render(&sample_root(), &[direct, nested], generated());

        assert!(html.contains(r#"<td style="padding-left: 1.5em">"#));
        assert!(html.contains(r#"<td style="padding-left: 3em">"#));
    }

    #[test]
    fn test_description_row_spans_table() {
        let fork = sample_fork("bob", vec![RepoRef::new("bob", "widget")]);
        let html = render(&sample_root(), &[fork], generated());

        assert!(html.contains(r#"<td colspan="6" style="padding-left: 1.5em">adds a frobnicator</td>"#));
    }

    #[test]
    fn test_api_text_is_escaped() {
        let fork = ForkRecord {
            description: "<script>alert(1)</script> & more".to_string(),
            ..sample_fork("bob", vec![RepoRef::new("bob", "widget")])
        };
        let html = render(&sample_root(), &[fork], generated());

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn test_footer_carries_generation_date() {
        let html = render(&sample_root(), &[], generated());
        assert!(html.contains("<footer>Generated on 2024-05-15 by fork-radar</footer>"));
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("fork-radar-report-test");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("public/index.html");

        write_report("<html></html>", &path).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        std::fs::remove_dir_all(&dir).ok();
    }
}
