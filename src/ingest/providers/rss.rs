// src/ingest/providers/rss.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::{FeedSource, RawEntry, SourceProvider};

/* ----------------------------
RSS 2.0
---------------------------- */

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    // <dc:date>; quick-xml matches on the local name
    #[serde(rename = "date")]
    dc_date: Option<String>,
    description: Option<String>,
    // <content:encoded>
    #[serde(rename = "encoded")]
    content_encoded: Option<String>,
}

/* ----------------------------
Atom 1.0
---------------------------- */

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    fn alternate_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| self.links.first())
            .and_then(|l| l.href.as_deref())
    }
}

/// RSS 2.0 / Atom provider for one configured feed.
pub struct RssProvider {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssProvider {
    /// Serve a fixed XML document instead of hitting the network.
    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(feed: &FeedSource, client: reqwest::Client) -> Self {
        Self {
            name: feed.name.clone(),
            mode: Mode::Http {
                url: feed.url.clone(),
                client,
            },
        }
    }

    /// Parse an RSS 2.0 or Atom document into raw entries labelled with `source`.
    pub fn parse_document(source: &str, xml: &str) -> Result<Vec<RawEntry>> {
        let xml_clean = scrub_html_entities_for_xml(xml);

        // quick-xml ignores the root element name, so an Atom document fails on the
        // missing <channel> and falls through to the Atom schema.
        match from_str::<Rss>(&xml_clean) {
            Ok(rss) => Ok(rss
                .channel
                .item
                .into_iter()
                .map(|it| RawEntry {
                    source: source.to_string(),
                    title: it.title.unwrap_or_default(),
                    summary: non_blank(it.description)
                        .or(it.content_encoded)
                        .unwrap_or_default(),
                    link: it.link.map(|l| l.trim().to_string()).unwrap_or_default(),
                    published: non_blank(it.pub_date).or_else(|| non_blank(it.dc_date)),
                })
                .collect()),
            Err(rss_err) => {
                let feed: AtomFeed = from_str(&xml_clean).map_err(|atom_err| {
                    anyhow!("not an RSS ({rss_err}) or Atom ({atom_err}) document")
                })?;
                if feed.entry.is_empty() && !xml_clean.contains("<feed") {
                    return Err(anyhow!("not an RSS or Atom document: {rss_err}"));
                }
                Ok(feed
                    .entry
                    .into_iter()
                    .map(|e| {
                        let link = e.alternate_link().unwrap_or_default().to_string();
                        RawEntry {
                            source: source.to_string(),
                            title: e.title.map(|t| t.value).unwrap_or_default(),
                            summary: e.summary.or(e.content).map(|t| t.value).unwrap_or_default(),
                            link,
                            published: non_blank(e.published).or_else(|| non_blank(e.updated)),
                        }
                    })
                    .collect())
            }
        }
    }
}

#[async_trait]
impl SourceProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawEntry>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_document(&self.name, s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("{} http get {}", self.name, url))?
                    .text()
                    .await
                    .with_context(|| format!("{} http .text()", self.name))?;
                Self::parse_document(&self.name, &body)
                    .with_context(|| format!("parsing {} feed xml", self.name))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// HTML-only entities are not valid XML; swap the common ones before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
