// tests/ranking.rs
use ai_news_digest::annotate::Pillar;
use ai_news_digest::rank::{rank, RankedList};
use ai_news_digest::Candidate;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 22, 12, 0, 0).unwrap()
}

fn cand(title: &str, score: i32, age_min: i64) -> Candidate {
    Candidate {
        title: title.to_string(),
        source: "Feed".to_string(),
        url: format!("https://example.test/{age_min}"),
        summary: String::new(),
        score,
        published_at: t0() - Duration::minutes(age_min),
        pillar: Pillar::AiTech,
        key_angle: String::new(),
    }
}

fn pool() -> Vec<Candidate> {
    vec![
        cand("OpenAI and Anthropic sign a joint safety pledge", 9, 30),
        cand("OpenAI and Anthropic sign a joint safety pledge, report says", 9, 10),
        cand("Nvidia earnings beat", 7, 5),
        cand("Gemini update", 4, 60),
        cand("Gemini update for workspace users", 4, 50),
        cand("Startup raises seed", 2, 15),
        cand("Robotics chip", 1, 1),
        cand("Weather model", -1, 0),
        cand("Quiet day", 0, 2),
    ]
}

fn titles(r: &RankedList) -> Vec<String> {
    r.iter().map(|c| c.title.clone()).collect()
}

#[test]
fn ranking_is_deterministic_under_input_shuffles() {
    let expected = titles(&rank(pool(), 5));
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let mut shuffled = pool();
        shuffled.shuffle(&mut rng);
        assert_eq!(titles(&rank(shuffled, 5)), expected);
    }
}

#[test]
fn expected_top_five() {
    let r = rank(pool(), 5);
    assert_eq!(
        titles(&r),
        vec![
            // newer of the two pledge stories wins the shared 40-char prefix
            "OpenAI and Anthropic sign a joint safety pledge, report says",
            "Nvidia earnings beat",
            "Gemini update for workspace users",
            "Gemini update",
            "Startup raises seed",
        ]
    );
}

#[test]
fn output_is_sorted_and_unique_by_prefix() {
    let r = rank(pool(), 100);
    let items = r.as_slice();
    assert!(items.iter().all(|c| c.score >= 0));
    for w in items.windows(2) {
        assert!(
            (w[0].score, w[0].published_at) >= (w[1].score, w[1].published_at),
            "{} before {}",
            w[0].title,
            w[1].title
        );
    }
    let mut keys: Vec<String> = items
        .iter()
        .map(|c| ai_news_digest::rank::dedup_key(&c.title))
        .collect();
    let n = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), n);
    // 9 inputs, minus one negative, minus one duplicate
    assert_eq!(n, 7);
}
