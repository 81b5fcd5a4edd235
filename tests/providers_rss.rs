// tests/providers_rss.rs
use ai_news_digest::ingest::providers::rss::RssProvider;
use ai_news_digest::ingest::types::SourceProvider;

const TECHCRUNCH_XML: &str = include_str!("fixtures/techcrunch_rss.xml");
const VERGE_XML: &str = include_str!("fixtures/verge_atom.xml");

#[tokio::test]
async fn rss_fixture_parses_items_in_document_order() {
    let provider = RssProvider::from_fixture("TechCrunch AI", TECHCRUNCH_XML);
    assert_eq!(provider.name(), "TechCrunch AI");

    let items = provider.fetch_latest().await.expect("rss parse ok");
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|e| e.source == "TechCrunch AI"));

    let first = &items[0];
    assert_eq!(first.title, "Anthropic raises $2B as Claude usage climbs");
    assert_eq!(first.link, "https://techcrunch.com/2026/02/22/anthropic-raises/");
    assert_eq!(
        first.published.as_deref(),
        Some("Sun, 22 Feb 2026 09:15:00 +0000")
    );
    // raw summary still carries markup; normalization happens later
    assert!(first.summary.contains("<b>startup</b>"));

    // untitled items are passed through, filtering drops them later
    assert_eq!(items[3].title, "");
}

#[tokio::test]
async fn atom_fixture_uses_alternate_link_and_updated_fallback() {
    let provider = RssProvider::from_fixture("The Verge AI", VERGE_XML);
    let items = provider.fetch_latest().await.expect("atom parse ok");
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].title, "OpenAI ships a new GPT model for developers");
    assert_eq!(items[0].link, "https://www.theverge.com/2026/2/22/openai-gpt");
    assert_eq!(items[0].published.as_deref(), Some("2026-02-22T06:30:00-05:00"));
    assert_eq!(items[0].summary, "<p>The release targets agent workflows.</p>");

    // no <published>: falls back to <updated>; no <summary>: falls back to <content>
    assert_eq!(items[1].link, "https://www.theverge.com/2026/2/21/gemini-mode");
    assert_eq!(items[1].published.as_deref(), Some("2026-02-21T15:00:00Z"));
    assert_eq!(items[1].summary, "Google adds a focus workflow to its assistant.");
}

#[tokio::test]
async fn garbage_document_is_an_error() {
    let provider = RssProvider::from_fixture("Broken", "<html><body>503</body></html>");
    assert!(provider.fetch_latest().await.is_err());
}

#[tokio::test]
async fn namespaced_date_and_content_fill_missing_rss_fields() {
    let provider = RssProvider::from_fixture(
        "VentureBeat AI",
        include_str!("fixtures/wordpress_rss.xml"),
    );
    let items = provider.fetch_latest().await.expect("rss parse ok");
    assert_eq!(items.len(), 2);

    // only <dc:date> and <content:encoded>
    assert_eq!(items[0].published.as_deref(), Some("2026-02-22T10:00:00Z"));
    assert_eq!(items[0].summary, "<p>Body</p>");

    // <pubDate> and <description> win when present
    assert_eq!(
        items[1].published.as_deref(),
        Some("Sun, 22 Feb 2026 08:00:00 +0000")
    );
    assert_eq!(items[1].summary, "Short teaser.");
}

#[tokio::test]
async fn atom_links_split_by_other_elements_still_parse() {
    let provider = RssProvider::from_fixture(
        "Episodes",
        include_str!("fixtures/atom_interleaved_links.xml"),
    );
    let items = provider.fetch_latest().await.expect("atom parse ok");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].link, "https://example.test/episodes/claude");
    assert_eq!(items[1].title, "GPT episode");
    // alternate is picked even when the enclosure comes first
    assert_eq!(items[1].link, "https://example.test/episodes/gpt");
}
