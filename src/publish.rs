// src/publish.rs
//! Render the ranked list into `news.js` and write it.
//!
//! The previous artifact may carry a hand-maintained `window.POSTED_ITEMS`
//! block. It is located, kept byte-for-byte and appended after the fresh list.
//! An empty ranked list means no write at all.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::{info, warn};

use crate::candidate::Candidate;
use crate::config::OutputCfg;
use crate::rank::RankedList;

fn posted_block_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?s)window\.POSTED_ITEMS\s*=\s*\[.*?\];").unwrap())
}

/// Escape for a double-quoted JS string literal.
pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '`' => out.push_str("\\`"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// The `window.POSTED_ITEMS = [...];` region of an artifact, if present.
pub fn extract_preserved_block(content: &str) -> Option<&str> {
    posted_block_re().find(content).map(|m| m.as_str())
}

/// Preserved block from the artifact at `path`. Missing or unreadable files have none.
pub fn read_preserved_block(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => extract_preserved_block(&content).map(str::to_owned),
        Err(e) => {
            if path.exists() {
                warn!(target: "publish", path = %path.display(), error = %e, "previous artifact unreadable, nothing to preserve");
            }
            None
        }
    }
}

fn render_item(c: &Candidate, rank: usize, run_time: DateTime<Utc>) -> String {
    format!(
        "  {{\n    id: \"news-{run_day}-{rank:02}\",\n    type: \"news\", status: \"inbox\", date: \"{date}\", rank: {rank},\n    title: \"{title}\",\n    source: \"{source}\",\n    url: \"{url}\",\n    summary: \"{summary}\",\n    key_angle: \"{angle}\",\n    pillar: \"{pillar}\"\n  }}",
        run_day = run_time.format("%Y%m%d"),
        date = c.published_at.format("%b %d, %Y"),
        title = escape_js(&c.title),
        source = escape_js(&c.source),
        url = escape_js(&c.url),
        summary = escape_js(&c.summary),
        angle = escape_js(&c.key_angle),
        pillar = escape_js(c.pillar.label()),
    )
}

/// The `NEWS_ITEMS` entries, ranks starting at 1, joined by `,\n`.
pub fn render_items(list: &RankedList, run_time: DateTime<Utc>) -> String {
    list.iter()
        .enumerate()
        .map(|(i, c)| render_item(c, i + 1, run_time))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Full artifact text.
pub fn render_artifact(
    list: &RankedList,
    title: &str,
    run_time: DateTime<Utc>,
    preserved: Option<&str>,
) -> String {
    let mut out = format!(
        "// {title}\n// Auto-updated every day by the scheduled digest job\n// Last updated: {stamp} UTC\n\nwindow.NEWS_ITEMS = [\n",
        stamp = run_time.format("%b %d, %Y at %I:%M %p"),
    );
    out.push_str(&render_items(list, run_time));
    out.push_str("\n];\n");
    if let Some(block) = preserved {
        out.push('\n');
        out.push_str(block);
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing selected; the existing artifact was left alone.
    Skipped,
    Written {
        path: PathBuf,
        items: usize,
        preserved_block: bool,
    },
}

/// Publish `list` to `output.path`. Empty lists skip the write.
pub fn publish(list: &RankedList, output: &OutputCfg, run_time: DateTime<Utc>) -> Result<WriteOutcome> {
    if list.is_empty() {
        warn!(target: "publish", path = %output.path.display(), "no items selected, keeping existing artifact");
        return Ok(WriteOutcome::Skipped);
    }

    let preserved = read_preserved_block(&output.path);
    let body = render_artifact(list, &output.title, run_time, preserved.as_deref());
    write_atomic(&output.path, body.as_bytes())?;

    info!(
        target: "publish",
        path = %output.path.display(),
        items = list.len(),
        preserved_block = preserved.is_some(),
        "artifact written"
    );
    Ok(WriteOutcome::Written {
        path: output.path.clone(),
        items: list.len(),
        preserved_block: preserved.is_some(),
    })
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file_name = path
        .file_name()
        .with_context(|| format!("output path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = write_tmp(&tmp, bytes).and_then(|()| {
        fs::rename(&tmp, path)
            .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_tmp(tmp: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = fs::File::create(tmp).with_context(|| format!("creating {}", tmp.display()))?;
    f.write_all(bytes)
        .with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(e) = f.sync_all() {
        warn!(target: "publish", path = %tmp.display(), error = %e, "fsync failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_backslashes_and_newlines() {
        assert_eq!(
            escape_js("He said \"hi\"\\ it's `x`\r\nok"),
            "He said \\\"hi\\\"\\\\ it\\'s \\`x\\`\\r\\nok"
        );
        assert_eq!(escape_js("plain — text"), "plain — text");
    }

    #[test]
    fn block_extraction_is_non_greedy_and_multiline() {
        let doc = "window.NEWS_ITEMS = [];\n\nwindow.POSTED_ITEMS = [\n  { id: \"p1\" },\n];\n// tail ];\n";
        assert_eq!(
            extract_preserved_block(doc),
            Some("window.POSTED_ITEMS = [\n  { id: \"p1\" },\n];")
        );
        assert_eq!(extract_preserved_block("window.NEWS_ITEMS = [];"), None);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory where the artifact should go makes rename fail
        let path = dir.path().join("news.js");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_atomic(&path, b"body").is_err());
        assert!(!dir.path().join("news.js.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn missing_file_has_no_block() {
        assert_eq!(read_preserved_block(Path::new("/definitely/not/here/news.js")), None);
    }
}
