//! Presentation annotations: pillar label and key angle.
//!
//! Both are ordered keyword rule tables evaluated first-match-wins:
//! - pillar: keywords tested against lowercased `title + " " + summary`
//! - angle:  keywords tested against the lowercased title only
//!
//! Rule order decides which value a multi-keyword title receives, so tables are
//! kept as data in the exact order they were configured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::relevance::clean_terms;

/// Placeholder replaced with the feed name in the fallback angle.
pub const SOURCE_PLACEHOLDER: &str = "{source}";

/// Closed set of topical categories shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pillar {
    #[default]
    #[serde(rename = "AI & Tech")]
    AiTech,
    #[serde(rename = "Entrepreneurship")]
    Entrepreneurship,
    #[serde(rename = "Productivity")]
    Productivity,
    #[serde(rename = "Personal Growth")]
    PersonalGrowth,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [
        Pillar::AiTech,
        Pillar::Entrepreneurship,
        Pillar::Productivity,
        Pillar::PersonalGrowth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Pillar::AiTech => "AI & Tech",
            Pillar::Entrepreneurship => "Entrepreneurship",
            Pillar::Productivity => "Productivity",
            Pillar::PersonalGrowth => "Personal Growth",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pillar {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pillar::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown pillar label: {s:?}"))
    }
}

/// One `(keywords, value)` row of a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule<T> {
    pub keywords: Vec<String>,
    pub value: T,
}

impl<T> KeywordRule<T> {
    pub fn new<S: AsRef<str>>(keywords: &[S], value: T) -> Self {
        Self {
            keywords: clean_terms(keywords),
            value,
        }
    }

    /// Any keyword is a substring of `text_lower`.
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|k| text_lower.contains(k.as_str()))
    }
}

/// Ordered rules with a fallback value. First matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable<T> {
    rules: Vec<KeywordRule<T>>,
    fallback: T,
}

impl<T> RuleTable<T> {
    pub fn new(rules: Vec<KeywordRule<T>>, fallback: T) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }

    /// Index and value of the first rule matching `text_lower`.
    pub fn first_match(&self, text_lower: &str) -> Option<(usize, &T)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, r)| r.matches(text_lower))
            .map(|(i, r)| (i, &r.value))
    }

    pub fn classify(&self, text_lower: &str) -> &T {
        self.first_match(text_lower)
            .map(|(_, v)| v)
            .unwrap_or(&self.fallback)
    }
}

/// Pillar + angle classifiers, built once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotator {
    pillars: RuleTable<Pillar>,
    angles: RuleTable<String>,
}

impl Annotator {
    pub fn new(pillars: RuleTable<Pillar>, angles: RuleTable<String>) -> Self {
        Self { pillars, angles }
    }

    pub fn pillar_rules(&self) -> &RuleTable<Pillar> {
        &self.pillars
    }

    pub fn angle_rules(&self) -> &RuleTable<String> {
        &self.angles
    }

    pub fn pillar(&self, title: &str, summary: &str) -> Pillar {
        let text = format!("{title} {summary}").to_lowercase();
        *self.pillars.classify(&text)
    }

    /// Angle for a title; unmatched titles get the fallback with the source name filled in.
    pub fn angle(&self, title: &str, source: &str) -> String {
        match self.angles.first_match(&title.to_lowercase()) {
            Some((_, template)) => template.clone(),
            None => self.angles.fallback().replace(SOURCE_PLACEHOLDER, source),
        }
    }

    /// Built-in tables.
    pub fn default_seed() -> Self {
        Self::new(default_pillar_rules(), default_angle_rules())
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::default_seed()
    }
}

pub fn default_pillar_rules() -> RuleTable<Pillar> {
    RuleTable::new(
        vec![
            KeywordRule::new(
                &["startup", "funding", "founder", "vc", "entrepreneur", "business", "revenue"],
                Pillar::Entrepreneurship,
            ),
            KeywordRule::new(
                &["productivity", "workflow", "tool", "habit", "system", "efficiency"],
                Pillar::Productivity,
            ),
            KeywordRule::new(
                &["career", "job", "mindset", "learn", "growth", "skill"],
                Pillar::PersonalGrowth,
            ),
        ],
        Pillar::AiTech,
    )
}

pub const DEFAULT_ANGLE_FALLBACK: &str =
    "Via {source} — the angle most people will miss when they share this story.";

pub fn default_angle_rules() -> RuleTable<String> {
    let rows: [(&[&str], &str); 6] = [
        (
            &["replace", "job", "engineer", "developer", "worker"],
            "Here's what most people are missing: this isn't about AI being smarter — it's about who adapts first.",
        ),
        (
            &["billion", "million", "fund", "raise", "invest"],
            "Follow the money. When this much capital moves in one direction, the market has already decided.",
        ),
        (
            &["vs", "rival", "compete", "beat", "win", "lose"],
            "This isn't just a product war. It's a values war. And that's what makes it interesting.",
        ),
        (
            &["china", "chinese", "beijing"],
            "While everyone watches OpenAI vs Anthropic, the real disruption might be coming from a completely different direction.",
        ),
        (
            &["launch", "release", "announce", "new", "introduce"],
            "What this actually means for the 99% of people who don't read the technical spec.",
        ),
        (
            &["ban", "regulate", "law", "congress", "eu", "government"],
            "Regulation without understanding is just noise. Here's what this actually does (and doesn't do).",
        ),
    ];
    RuleTable::new(
        rows.iter()
            .map(|&(kw, tpl)| KeywordRule::new(kw, tpl.to_string()))
            .collect(),
        DEFAULT_ANGLE_FALLBACK.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_first_match_wins_over_later_rules() {
        let a = Annotator::default_seed();
        // "funding" (Entrepreneurship) and "workflow" (Productivity) both match
        assert_eq!(
            a.pillar("Workflow startup lands funding", ""),
            Pillar::Entrepreneurship
        );
        assert_eq!(a.pillar("New workflow tool", ""), Pillar::Productivity);
    }

    #[test]
    fn pillar_considers_summary_and_defaults() {
        let a = Annotator::default_seed();
        assert_eq!(a.pillar("Model card", "how to learn prompting"), Pillar::PersonalGrowth);
        assert_eq!(a.pillar("Quantum weirdness", "photons"), Pillar::AiTech);
    }

    #[test]
    fn angle_uses_title_only() {
        let a = Annotator::default_seed();
        let fallback = a.angle("Quantum weirdness", "Wired AI");
        assert_eq!(
            fallback,
            "Via Wired AI — the angle most people will miss when they share this story."
        );
        assert_eq!(
            a.angle("Quantum weirdness", "Ars Technica"),
            a.angle("QUANTUM WEIRDNESS", "Ars Technica")
        );
    }

    #[test]
    fn angle_rule_order_is_respected() {
        let a = Annotator::default_seed();
        // matches "raise" (money, rule 2) and "rival" (rule 3) and "launch" (rule 5)
        let got = a.angle("Rival startup to raise cash after launch", "X");
        assert!(got.starts_with("Follow the money."), "{got}");
        // "developer" (rule 1) beats "billion" (rule 2)
        let got = a.angle("Billion dollar developer tools", "X");
        assert!(got.starts_with("Here's what most people are missing"), "{got}");
    }

    #[test]
    fn pillar_labels_round_trip_through_from_str() {
        for p in Pillar::ALL {
            assert_eq!(p.label().parse::<Pillar>().unwrap(), p);
        }
        assert!("Gardening".parse::<Pillar>().is_err());
    }
}
