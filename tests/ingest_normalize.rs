// tests/ingest_normalize.rs
use ai_news_digest::ingest::{normalize_text, summarize, TRUNCATION_MARKER};

#[test]
fn entities_are_decoded_and_tags_removed() {
    let s = "<p>Claude&#39;s &amp; GPT&apos;s <a href=\"x\">edge</a></p>";
    assert_eq!(normalize_text(s), "Claude's & GPT's edge");
}

#[test]
fn multiline_tags_and_whitespace_runs() {
    let s = "Hello<img\n src=\"a.png\"\n/>\t\t world \n\n again";
    assert_eq!(normalize_text(s), "Hello world again");
}

#[test]
fn summary_at_cap_is_unchanged() {
    let text = "x".repeat(250);
    assert_eq!(summarize(&text, 250), text);
    assert_eq!(summarize("  short  ", 250), "short");
}

#[test]
fn summary_over_cap_keeps_cap_chars_plus_marker() {
    let text = "y".repeat(251);
    let out = summarize(&text, 250);
    assert_eq!(out, format!("{}{}", "y".repeat(250), TRUNCATION_MARKER));
}

#[test]
fn cap_counts_characters_after_normalization() {
    // markup does not count towards the cap
    let raw = format!("<div class=\"long-wrapper\">{}</div>", "ü".repeat(250));
    assert_eq!(summarize(&raw, 250), "ü".repeat(250));
}
