// src/config/mod.rs
//! Digest configuration: feeds, selection knobs, vocabularies, rule tables, output.
//!
//! Loaded from TOML (or JSON) with every section optional; whatever is missing
//! comes from the built-in seed. A few scalar knobs can be overridden from the
//! environment so the scheduled job can be tuned without editing the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::annotate::{
    default_angle_rules, default_pillar_rules, Annotator, KeywordRule, Pillar, RuleTable,
};
use crate::freshness::{DEFAULT_FALLBACK_AGE_DAYS, DEFAULT_MAX_AGE_HOURS};
use crate::ingest::types::FeedSource;
use crate::ingest::DEFAULT_ENTRIES_PER_FEED;
use crate::rank::DEFAULT_TOP_N;
use crate::relevance::Vocabulary;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";
pub const DEFAULT_OUTPUT_PATH: &str = "data/news.js";
pub const DEFAULT_SUMMARY_CAP: usize = 250;

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const ENV_OUTPUT_PATH: &str = "DIGEST_OUTPUT_PATH";
pub const ENV_TOP_N: &str = "DIGEST_TOP_N";
pub const ENV_MAX_AGE_HOURS: &str = "DIGEST_MAX_AGE_HOURS";

/* ----------------------------
Config schema (from TOML / JSON)
---------------------------- */

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    pub selection: SelectionCfg,
    pub output: OutputCfg,
    pub feeds: Option<Vec<FeedSource>>,
    pub vocabulary: Vocabulary,
    pub pillars: Option<PillarRulesCfg>,
    pub angles: Option<AngleRulesCfg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCfg {
    pub top_n: usize,
    pub max_age_hours: i64,
    pub entries_per_feed: usize,
    pub fallback_age_days: i64,
    pub summary_cap: usize,
}

impl Default for SelectionCfg {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
            fallback_age_days: DEFAULT_FALLBACK_AGE_DAYS,
            summary_cap: DEFAULT_SUMMARY_CAP,
        }
    }
}

impl SelectionCfg {
    /// Saturates at [`Duration::MAX`] for values chrono cannot represent.
    pub fn max_age(&self) -> Duration {
        Duration::try_hours(self.max_age_hours).unwrap_or(Duration::MAX)
    }

    /// Saturates at [`Duration::MAX`] for values chrono cannot represent.
    pub fn fallback_age(&self) -> Duration {
        Duration::try_days(self.fallback_age_days).unwrap_or(Duration::MAX)
    }
}

/// `now - span` must stay inside chrono's date range.
fn span_fits(span: Option<Duration>) -> bool {
    span.and_then(|d| Utc::now().checked_sub_signed(d)).is_some()
}

fn max_age_fits(hours: i64) -> bool {
    span_fits(Duration::try_hours(hours))
}

fn fallback_age_fits(days: i64) -> bool {
    span_fits(Duration::try_days(days))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputCfg {
    pub path: PathBuf,
    /// First header line of the generated file.
    pub title: String,
}

impl Default for OutputCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            title: "Daily AI & Tech News".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PillarRulesCfg {
    #[serde(default)]
    pub default: Pillar,
    #[serde(default)]
    pub rules: Vec<PillarRuleCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PillarRuleCfg {
    pub label: Pillar,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AngleRulesCfg {
    pub fallback: String,
    #[serde(default)]
    pub rules: Vec<AngleRuleCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AngleRuleCfg {
    /// Label for error messages; the rule index is used when absent.
    pub name: Option<String>,
    pub keywords: Vec<String>,
    pub template: String,
}

/* ----------------------------
Compiled, immutable configuration
---------------------------- */

/// Everything one pipeline run needs. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub feeds: Vec<FeedSource>,
    pub selection: SelectionCfg,
    pub output: OutputCfg,
    pub vocabulary: Vocabulary,
    pub annotator: Annotator,
}

impl DigestConfig {
    /// The built-in configuration, no file involved.
    pub fn builtin() -> Self {
        Self::compile(DigestSettings::default())
    }

    pub fn from_settings(settings: DigestSettings) -> Result<Self> {
        validate(&settings)?;
        Ok(Self::compile(settings))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: DigestSettings = toml::from_str(s).context("parsing digest TOML")?;
        Self::from_settings(settings)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: DigestSettings = serde_json::from_str(s).context("parsing digest JSON")?;
        Self::from_settings(settings)
    }

    /// Load from an explicit path. `.json` files are read as JSON, anything else as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading digest config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = if ext == "json" {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        cfg.with_context(|| format!("invalid digest config {}", path.display()))
    }

    /// Resolve configuration the way the binary does:
    /// 1) $DIGEST_CONFIG_PATH (must exist)
    /// 2) config/digest.toml
    /// 3) built-in seed
    ///
    /// then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                info!(target: "config", "no {DEFAULT_CONFIG_PATH}, using built-in configuration");
                Self::builtin()
            }
        };
        cfg.apply_env_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply scalar overrides. Unparseable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = lookup(ENV_OUTPUT_PATH).filter(|p| !p.trim().is_empty()) {
            self.output.path = PathBuf::from(p.trim());
        }
        if let Some(n) = parse_positive::<usize>(ENV_TOP_N, lookup(ENV_TOP_N)) {
            self.selection.top_n = n;
        }
        if let Some(h) = parse_positive::<i64>(ENV_MAX_AGE_HOURS, lookup(ENV_MAX_AGE_HOURS)) {
            if max_age_fits(h) {
                self.selection.max_age_hours = h;
            } else {
                warn!(target: "config", var = ENV_MAX_AGE_HOURS, value = h, "ignoring out-of-range override");
            }
        }
    }

    fn compile(s: DigestSettings) -> Self {
        let pillars = match s.pillars {
            Some(p) => RuleTable::new(
                p.rules
                    .iter()
                    .map(|r| KeywordRule::new(&r.keywords, r.label))
                    .collect(),
                p.default,
            ),
            None => default_pillar_rules(),
        };
        let angles = match s.angles {
            Some(a) => RuleTable::new(
                a.rules
                    .iter()
                    .map(|r| KeywordRule::new(&r.keywords, r.template.clone()))
                    .collect(),
                a.fallback,
            ),
            None => default_angle_rules(),
        };
        Self {
            feeds: s.feeds.unwrap_or_else(default_feeds),
            selection: s.selection,
            output: s.output,
            vocabulary: s.vocabulary.normalized(),
            annotator: Annotator::new(pillars, angles),
        }
    }
}

fn validate(s: &DigestSettings) -> Result<()> {
    let sel = &s.selection;
    if sel.top_n == 0 {
        bail!("selection.top_n must be at least 1");
    }
    if sel.max_age_hours <= 0 {
        bail!("selection.max_age_hours must be positive");
    }
    if !max_age_fits(sel.max_age_hours) {
        bail!("selection.max_age_hours = {} is out of range", sel.max_age_hours);
    }
    if sel.entries_per_feed == 0 {
        bail!("selection.entries_per_feed must be at least 1");
    }
    if sel.fallback_age_days < 0 {
        bail!("selection.fallback_age_days must not be negative");
    }
    if !fallback_age_fits(sel.fallback_age_days) {
        bail!("selection.fallback_age_days = {} is out of range", sel.fallback_age_days);
    }
    if sel.summary_cap == 0 {
        bail!("selection.summary_cap must be at least 1");
    }
    if let Some(feeds) = &s.feeds {
        for f in feeds {
            if f.name.trim().is_empty() || f.url.trim().is_empty() {
                bail!("feed entries need both a name and a url");
            }
        }
    }
    if let Some(p) = &s.pillars {
        if let Some(i) = p.rules.iter().position(|r| r.keywords.iter().all(|k| k.trim().is_empty())) {
            bail!("pillars.rules[{i}] has no keywords");
        }
    }
    if let Some(a) = &s.angles {
        for (i, r) in a.rules.iter().enumerate() {
            let label = r.name.clone().unwrap_or_else(|| i.to_string());
            if r.keywords.iter().all(|k| k.trim().is_empty()) {
                bail!("angles.rules[{label}] has no keywords");
            }
            if r.template.trim().is_empty() {
                bail!("angles.rules[{label}] has an empty template");
            }
        }
    }
    Ok(())
}

fn parse_positive<T>(name: &str, raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Some(v),
        _ => {
            warn!(target: "config", var = name, value = %raw, "ignoring invalid override");
            None
        }
    }
}

/// Built-in feed list.
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "TechCrunch AI",
            "https://techcrunch.com/category/artificial-intelligence/feed/",
        ),
        FeedSource::new(
            "The Verge AI",
            "https://www.theverge.com/ai-artificial-intelligence/rss/index.xml",
        ),
        FeedSource::new("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
        FeedSource::new("Wired AI", "https://www.wired.com/feed/tag/ai/latest/rss"),
        FeedSource::new(
            "Ars Technica",
            "https://feeds.arstechnica.com/arstechnica/technology-lab",
        ),
    ]
}
