//! Candidate Scorer: matches a candidate's skills against a requirement list.
//!
//! Algorithm, per required skill in input order:
//! 1. verbatim in the candidate set → explicit match, importance weight credited
//! 2. best entanglement with any candidate skill above the threshold →
//!    inferred match, `INFERRED_MATCH_CREDIT` credited
//! 3. otherwise missing
//!
//! Candidate skills that are alias targets but were not matched add
//! `RELATED_SKILL_BONUS` each. The resulting score is RAW: use
//! `normalized_score` for the 0–10 view and `coverage_pct` for 0–100.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::normalizer::SkillNormalizer;
use crate::matching::similarity::SimilarityEngine;
use crate::matching::{MatchError, Skill};

/// Flat credit for a required skill satisfied only through a related skill.
pub const INFERRED_MATCH_CREDIT: f64 = 0.5;

/// Partial relatedness credit per unmatched alias-target skill.
pub const RELATED_SKILL_BONUS: f64 = 0.3;

/// Coverage points added when at least one match was inferred.
pub const INFERRED_COVERAGE_BONUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub skill: Skill,
    pub inferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<MatchedSkill>,
    pub missing: Vec<Skill>,
    /// Raw weighted score; not bounded above.
    pub score: f64,
}

impl MatchResult {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    pub fn has_inferred(&self) -> bool {
        self.matched.iter().any(|m| m.inferred)
    }

    pub fn is_matched(&self, skill: &str) -> bool {
        self.matched.iter().any(|m| m.skill == skill)
    }

    /// `min(10, max(0, raw * 2))`. Saturates for any raw score above 5.
    pub fn normalized_score(&self) -> f64 {
        (self.score * 2.0).clamp(0.0, 10.0)
    }

    /// Share of required skills matched, plus a flat bonus when any match was inferred.
    pub fn coverage_pct(&self) -> f64 {
        let required = self.required_count();
        if required == 0 {
            return 0.0;
        }
        let base = self.matched.len() as f64 / required as f64 * 100.0;
        let bonus = if self.has_inferred() {
            INFERRED_COVERAGE_BONUS
        } else {
            0.0
        };
        (base + bonus).min(100.0)
    }
}

pub struct CandidateScorer {
    normalizer: Arc<SkillNormalizer>,
    similarity: Arc<SimilarityEngine>,
}

impl CandidateScorer {
    pub fn new(normalizer: Arc<SkillNormalizer>, similarity: Arc<SimilarityEngine>) -> Self {
        Self {
            normalizer,
            similarity,
        }
    }

    /// Scores `candidate_skills` against `required_skills`. Both sides are
    /// normalized here, so callers may pass raw strings.
    pub fn score<S: AsRef<str>>(
        &self,
        candidate_skills: &BTreeSet<Skill>,
        required_skills: &[S],
    ) -> Result<MatchResult, MatchError> {
        let required = self.normalizer.normalize_all(required_skills);
        if required.is_empty() {
            return Err(MatchError::InvalidInput(
                "required_skills cannot be empty".to_string(),
            ));
        }

        let candidate: BTreeSet<Skill> = candidate_skills
            .iter()
            .map(|s| self.normalizer.normalize(s))
            .filter(|s| !s.is_empty())
            .collect();

        let ontology = self.similarity.ontology();
        let threshold = self.similarity.params().entanglement_threshold;

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut score = 0.0;

        for skill in required {
            if candidate.contains(&skill) {
                score += ontology.importance(&skill).weight();
                matched.push(MatchedSkill {
                    skill,
                    inferred: false,
                });
                continue;
            }

            let best = candidate
                .iter()
                .map(|cs| self.similarity.entanglement(&skill, cs))
                .fold(0.0_f64, f64::max);

            if best > threshold {
                score += INFERRED_MATCH_CREDIT;
                matched.push(MatchedSkill {
                    skill,
                    inferred: true,
                });
            } else {
                missing.push(skill);
            }
        }

        let matched_names: HashSet<&str> = matched.iter().map(|m| m.skill.as_str()).collect();
        let related_bonus = candidate
            .iter()
            .filter(|cs| self.normalizer.is_alias_target(cs))
            .filter(|cs| !matched_names.contains(cs.as_str()))
            .count() as f64
            * RELATED_SKILL_BONUS;

        Ok(MatchResult {
            matched,
            missing,
            score: score + related_bonus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::embedding::HashedTrigramEmbedder;
    use crate::matching::ontology::default_ontology;
    use crate::matching::similarity::SimilarityParams;

    fn scorer() -> CandidateScorer {
        let similarity = SimilarityEngine::new(
            Arc::new(default_ontology()),
            Box::new(HashedTrigramEmbedder::default()),
            SimilarityParams::default(),
        );
        CandidateScorer::new(Arc::new(SkillNormalizer::default()), Arc::new(similarity))
    }

    fn set(skills: &[&str]) -> BTreeSet<Skill> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_full_match_has_no_missing() {
        let required = ["python", "aws", "react"];
        let result = scorer().score(&set(&required), &required).unwrap();
        assert!(result.missing.is_empty());
        assert_eq!(result.matched.len(), 3);
        assert!(result.matched.iter().all(|m| !m.inferred));
        // python 3 + aws 2 + react 1; python and react are alias targets but matched
        // aws is an alias target too, also matched → no bonus
        assert!((result.score - 6.0).abs() < 1e-9, "score was {}", result.score);
    }

    #[test]
    fn test_empty_candidate_misses_everything() {
        let required = ["python", "aws"];
        let result = scorer().score(&BTreeSet::new(), &required).unwrap();
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, vec!["python".to_string(), "aws".to_string()]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_empty_requirements_is_invalid_input() {
        let required: [&str; 0] = [];
        let err = scorer().score(&set(&["python"]), &required).unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[test]
    fn test_alias_bonus_not_double_counted() {
        let required = ["python", "aws", "react"];
        let result = scorer().score(&set(&["python", "django"]), &required).unwrap();
        assert_eq!(
            result.matched,
            vec![MatchedSkill {
                skill: "python".to_string(),
                inferred: false
            }]
        );
        assert_eq!(result.missing, vec!["aws".to_string(), "react".to_string()]);
        assert!((result.score - 3.0).abs() < 1e-9, "score was {}", result.score);
    }

    #[test]
    fn test_unmatched_alias_target_earns_bonus() {
        let required = ["go"];
        let result = scorer().score(&set(&["java"]), &required).unwrap();
        assert_eq!(result.missing, vec!["go".to_string()]);
        assert!((result.score - RELATED_SKILL_BONUS).abs() < 1e-9);
    }

    #[test]
    fn test_entangled_skill_counts_as_inferred() {
        // react ↔ javascript is a direct 0.95 ontology entry
        let required = ["javascript"];
        let result = scorer().score(&set(&["react"]), &required).unwrap();
        assert_eq!(result.matched.len(), 1);
        assert!(result.matched[0].inferred);
        // inferred credit + react (alias target, not matched) bonus
        let expected = INFERRED_MATCH_CREDIT + RELATED_SKILL_BONUS;
        assert!((result.score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_skill_below_threshold_is_missing() {
        // react ↔ angular is 0.65, not strictly above the threshold
        let required = ["angular"];
        let result = scorer().score(&set(&["react"]), &required).unwrap();
        assert_eq!(result.missing, vec!["angular".to_string()]);
    }

    #[test]
    fn test_requirements_are_normalized_and_deduplicated() {
        let required = ["Python3", "python", " AWS "];
        let result = scorer().score(&set(&["python", "aws"]), &required).unwrap();
        assert_eq!(result.required_count(), 2);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_unregistered_skill_defaults_to_medium_weight() {
        let required = ["terraform"];
        let result = scorer().score(&set(&["terraform"]), &required).unwrap();
        assert!((result.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_score_clips_at_ten() {
        let result = MatchResult {
            matched: vec![],
            missing: vec!["x".to_string()],
            score: 7.5,
        };
        assert_eq!(result.normalized_score(), 10.0);
        let low = MatchResult {
            score: 1.2,
            ..result
        };
        assert!((low.normalized_score() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_pct_adds_inferred_bonus_and_caps() {
        let result = MatchResult {
            matched: vec![
                MatchedSkill {
                    skill: "a".to_string(),
                    inferred: false,
                },
                MatchedSkill {
                    skill: "b".to_string(),
                    inferred: true,
                },
            ],
            missing: vec!["c".to_string(), "d".to_string()],
            score: 0.0,
        };
        assert!((result.coverage_pct() - 60.0).abs() < 1e-9);

        let full = MatchResult {
            missing: vec![],
            ..result
        };
        assert_eq!(full.coverage_pct(), 100.0);
    }
}
