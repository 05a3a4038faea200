//! Justification Composer: narrative shortlist justification for one candidate.
//!
//! The recommendation tier and the normalized score are pure functions of the
//! raw score. Only phrase choice is random, drawn from an injected `StdRng`
//! so tests can seed it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::matching::ontology::{Importance, SkillOntology};
use crate::matching::scorer::MatchResult;

/// Raw score at or above which a candidate is shortlisted outright.
pub const AUTO_SHORTLIST_THRESHOLD: f64 = 2.0;
/// Raw score at or above which a candidate is considered with reservations.
pub const CONSIDER_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    StrongShortlist,
    ConsiderWithReservations,
    NotRecommended,
}

impl RecommendationTier {
    pub fn from_raw_score(score: f64) -> Self {
        if score >= AUTO_SHORTLIST_THRESHOLD {
            RecommendationTier::StrongShortlist
        } else if score >= CONSIDER_THRESHOLD {
            RecommendationTier::ConsiderWithReservations
        } else {
            RecommendationTier::NotRecommended
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecommendationTier::StrongShortlist => "Strong Shortlist",
            RecommendationTier::ConsiderWithReservations => "Consider with Reservations",
            RecommendationTier::NotRecommended => "Not Recommended",
        }
    }

    fn decision(self) -> &'static str {
        match self {
            RecommendationTier::StrongShortlist => "shortlisted",
            RecommendationTier::ConsiderWithReservations => "considered",
            RecommendationTier::NotRecommended => "not recommended",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Justification {
    pub candidate_name: String,
    pub text: String,
    pub recommendation_tier: RecommendationTier,
    /// Raw score rescaled to 0–10 (clipped).
    pub normalized_score: f64,
    pub generated_at: DateTime<Utc>,
}

fn match_phrases(importance: Importance) -> &'static [&'static str] {
    match importance {
        Importance::Critical => &[
            "exceptional skills in",
            "expert-level knowledge of",
            "deep expertise in",
        ],
        Importance::High => &[
            "strong experience with",
            "proficient in",
            "substantial background in",
        ],
        Importance::Medium => &[
            "working knowledge of",
            "demonstrated skills in",
            "experience with",
        ],
        Importance::Low => &["familiarity with", "exposure to", "basic knowledge of"],
    }
}

fn missing_phrases(importance: Importance) -> &'static [&'static str] {
    match importance {
        Importance::Critical => &[
            "lacks required expertise in",
            "missing critical skills in",
            "no demonstrated experience with",
        ],
        Importance::High => &[
            "limited experience with",
            "missing important skills in",
            "needs development in",
        ],
        Importance::Medium => &[
            "could improve in",
            "would benefit from more experience in",
            "has some gaps in",
        ],
        Importance::Low => &[
            "limited exposure to",
            "could gain familiarity with",
            "has minimal experience with",
        ],
    }
}

pub struct JustificationComposer {
    ontology: Arc<SkillOntology>,
    rng: Mutex<StdRng>,
}

impl JustificationComposer {
    /// Phrase choice seeded from OS entropy.
    pub fn new(ontology: Arc<SkillOntology>) -> Self {
        Self {
            ontology,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible phrase choice.
    pub fn with_seed(ontology: Arc<SkillOntology>, seed: u64) -> Self {
        Self {
            ontology,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn justify(&self, name: &str, result: &MatchResult) -> Justification {
        let ontology = &self.ontology;
        let tier = RecommendationTier::from_raw_score(result.score);
        let normalized_score = result.normalized_score();

        let (positive, negative) = {
            let mut rng = self.rng.lock();
            let positive: Vec<String> = result
                .matched
                .iter()
                .map(|m| {
                    let phrase = pick(&mut rng, match_phrases(ontology.importance(&m.skill)));
                    if m.inferred {
                        format!("{phrase} {} (inferred from related skills)", m.skill)
                    } else {
                        format!("{phrase} {}", m.skill)
                    }
                })
                .collect();
            let negative: Vec<String> = result
                .missing
                .iter()
                .map(|skill| {
                    let phrase = pick(&mut rng, missing_phrases(ontology.importance(skill)));
                    format!("{phrase} {skill}")
                })
                .collect();
            (positive, negative)
        };

        let mut parts = Vec::new();
        if !positive.is_empty() {
            parts.push(format!(
                "{name} is {} due to {}",
                tier.decision(),
                join_phrases(&positive)
            ));
        }
        if !negative.is_empty() {
            parts.push(format!("However, they have {}", join_phrases(&negative)));
        }
        if parts.is_empty() {
            parts.push(format!(
                "{name} has no significant matching skills for this position"
            ));
        }

        Justification {
            candidate_name: name.to_string(),
            text: format!("{}. Overall score: {normalized_score:.1}/10", parts.join(" ")),
            recommendation_tier: tier,
            normalized_score,
            generated_at: Utc::now(),
        }
    }
}

fn pick(rng: &mut StdRng, phrases: &'static [&'static str]) -> &'static str {
    phrases.choose(rng).copied().unwrap_or_default()
}

/// "a", "a and b", "a, b, and c".
fn join_phrases(phrases: &[String]) -> String {
    match phrases {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ontology::default_ontology;
    use crate::matching::scorer::MatchedSkill;

    fn seeded(seed: u64) -> JustificationComposer {
        JustificationComposer::with_seed(Arc::new(default_ontology()), seed)
    }

    fn result(matched: &[(&str, bool)], missing: &[&str], score: f64) -> MatchResult {
        MatchResult {
            matched: matched
                .iter()
                .map(|(s, inferred)| MatchedSkill {
                    skill: s.to_string(),
                    inferred: *inferred,
                })
                .collect(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            score,
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(
            RecommendationTier::from_raw_score(2.0),
            RecommendationTier::StrongShortlist
        );
        assert_eq!(
            RecommendationTier::from_raw_score(1.99),
            RecommendationTier::ConsiderWithReservations
        );
        assert_eq!(
            RecommendationTier::from_raw_score(1.0),
            RecommendationTier::ConsiderWithReservations
        );
        assert_eq!(
            RecommendationTier::from_raw_score(0.5),
            RecommendationTier::NotRecommended
        );
    }

    #[test]
    fn test_tier_and_score_are_deterministic_across_unseeded_calls() {
        let composer = JustificationComposer::new(Arc::new(default_ontology()));
        let r = result(&[("python", false)], &["aws", "react"], 3.0);
        for _ in 0..10 {
            let j = composer.justify("Ada", &r);
            assert_eq!(j.recommendation_tier, RecommendationTier::StrongShortlist);
            assert_eq!(j.normalized_score, 6.0);
        }
    }

    #[test]
    fn test_same_seed_same_text() {
        let r = result(&[("python", false), ("aws", true)], &["react"], 3.5);
        let a = seeded(7).justify("Ada", &r);
        let b = seeded(7).justify("Ada", &r);
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn test_text_structure() {
        let r = result(&[("python", false)], &["aws"], 3.0);
        let j = seeded(1).justify("Ada", &r);
        assert!(j.text.starts_with("Ada is shortlisted due to"));
        assert!(j.text.contains("However, they have"));
        assert!(j.text.ends_with("Overall score: 6.0/10"));
    }

    #[test]
    fn test_no_skills_at_all() {
        let r = result(&[], &[], 0.0);
        let j = seeded(1).justify("Zed", &r);
        assert!(j.text.contains("has no significant matching skills"));
        assert_eq!(j.recommendation_tier, RecommendationTier::NotRecommended);
        assert_eq!(j.normalized_score, 0.0);
    }

    #[test]
    fn test_normalized_score_saturates() {
        let r = result(&[("python", false), ("aws", false), ("java", false)], &[], 7.0);
        let j = seeded(1).justify("Max", &r);
        assert_eq!(j.normalized_score, 10.0);
    }

    #[test]
    fn test_join_phrases() {
        let p = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_phrases(&p(&["a"])), "a");
        assert_eq!(join_phrases(&p(&["a", "b"])), "a and b");
        assert_eq!(join_phrases(&p(&["a", "b", "c"])), "a, b, and c");
    }
}
