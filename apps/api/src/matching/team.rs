//! Team Selector: ranks a candidate pool and picks a fixed-size team.
//!
//! Coverage is computed over the UNION of members' matches: a required skill
//! is covered if any member matched it, explicitly or by inference.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::matching::extractor::CandidateProfile;
use crate::matching::normalizer::SkillNormalizer;
use crate::matching::scorer::{CandidateScorer, MatchResult};
use crate::matching::{MatchError, Skill};

/// A member's match ratio must exceed this for an interview recommendation.
const INTERVIEW_MATCH_RATIO: f64 = 0.75;

/// Suggested next step for an individual team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningAdvice {
    RecommendInterview,
    TechnicalScreening,
    UpskillingPlan,
}

impl ScreeningAdvice {
    pub fn for_result(result: &MatchResult) -> Self {
        let required = result.required_count();
        let ratio = if required == 0 {
            0.0
        } else {
            result.matched.len() as f64 / required as f64
        };
        if ratio > INTERVIEW_MATCH_RATIO {
            ScreeningAdvice::RecommendInterview
        } else if result.has_inferred() {
            ScreeningAdvice::TechnicalScreening
        } else {
            ScreeningAdvice::UpskillingPlan
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ScreeningAdvice::RecommendInterview => "Strong match - recommend interview",
            ScreeningAdvice::TechnicalScreening => {
                "Potential match - suggest technical screening"
            }
            ScreeningAdvice::UpskillingPlan => "Partial match - consider upskilling plan",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub profile: CandidateProfile,
    pub result: MatchResult,
    pub coverage_pct: f64,
    pub advice: ScreeningAdvice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecommendation {
    pub members: Vec<TeamMember>,
    /// Share of required skills covered by at least one member, 0–100.
    pub coverage_pct: f64,
    pub missing_skills: Vec<Skill>,
}

pub struct TeamSelector {
    normalizer: Arc<SkillNormalizer>,
    scorer: Arc<CandidateScorer>,
}

impl TeamSelector {
    pub fn new(normalizer: Arc<SkillNormalizer>, scorer: Arc<CandidateScorer>) -> Self {
        Self { normalizer, scorer }
    }

    /// Scores every candidate, sorts by descending raw score (ties keep pool
    /// order) and keeps the first `team_size`. A pool smaller than `team_size`
    /// is returned whole.
    pub fn recommend_team<S: AsRef<str>>(
        &self,
        pool: &[CandidateProfile],
        required_skills: &[S],
        team_size: usize,
    ) -> Result<TeamRecommendation, MatchError> {
        if team_size == 0 {
            return Err(MatchError::InvalidInput(
                "team_size must be at least 1".to_string(),
            ));
        }
        let required = self.normalizer.normalize_all(required_skills);
        if required.is_empty() {
            return Err(MatchError::InvalidInput(
                "required_skills cannot be empty".to_string(),
            ));
        }

        let mut ranked = pool
            .iter()
            .map(|profile| {
                let result = self.scorer.score(&profile.all_skills(), &required)?;
                Ok(TeamMember {
                    profile: profile.clone(),
                    coverage_pct: result.coverage_pct(),
                    advice: ScreeningAdvice::for_result(&result),
                    result,
                })
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        // `sort_by` is stable, so equal scores keep their pool order.
        ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
        ranked.truncate(team_size);

        let covered: HashSet<&str> = ranked
            .iter()
            .flat_map(|m| m.result.matched.iter().map(|s| s.skill.as_str()))
            .collect();
        let missing_skills: Vec<Skill> = required
            .iter()
            .filter(|s| !covered.contains(s.as_str()))
            .cloned()
            .collect();
        let coverage_pct =
            (required.len() - missing_skills.len()) as f64 / required.len() as f64 * 100.0;

        info!(
            "Team of {} selected from {} candidates: coverage {:.1}%",
            ranked.len(),
            pool.len(),
            coverage_pct
        );

        Ok(TeamRecommendation {
            members: ranked,
            coverage_pct,
            missing_skills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::embedding::HashedTrigramEmbedder;
    use crate::matching::ontology::default_ontology;
    use crate::matching::similarity::{SimilarityEngine, SimilarityParams};

    fn selector() -> TeamSelector {
        let normalizer = Arc::new(SkillNormalizer::default());
        let similarity = Arc::new(SimilarityEngine::new(
            Arc::new(default_ontology()),
            Box::new(HashedTrigramEmbedder::default()),
            SimilarityParams::default(),
        ));
        let scorer = Arc::new(CandidateScorer::new(normalizer.clone(), similarity));
        TeamSelector::new(normalizer, scorer)
    }

    fn candidate(name: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile::with_skills(name, skills.iter().map(|s| s.to_string()))
    }

    fn pool_of_five() -> Vec<CandidateProfile> {
        vec![
            candidate("Ada", &["aws"]),
            candidate("Ben", &["python"]),
            candidate("Cy", &["aws"]),
            candidate("Dee", &["python", "aws"]),
            candidate("Eve", &["terraform"]),
        ]
    }

    #[test]
    fn test_selects_exact_team_size_sorted_with_stable_ties() {
        let team = selector()
            .recommend_team(&pool_of_five(), &["python", "aws"], 3)
            .unwrap();
        let names: Vec<&str> = team.members.iter().map(|m| m.profile.name.as_str()).collect();
        // Dee 5.0, Ben 3.0, then Ada and Cy tie at 2.0 → Ada first (pool order)
        assert_eq!(names, vec!["Dee", "Ben", "Ada"]);
        let scores: Vec<f64> = team.members.iter().map(|m| m.result.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(team.coverage_pct, 100.0);
        assert!(team.missing_skills.is_empty());
    }

    #[test]
    fn test_small_pool_returns_whole_pool() {
        let pool = vec![candidate("Solo", &["python"])];
        let team = selector().recommend_team(&pool, &["python", "aws"], 3).unwrap();
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.coverage_pct, 50.0);
        assert_eq!(team.missing_skills, vec!["aws".to_string()]);
    }

    #[test]
    fn test_empty_pool_has_zero_coverage() {
        let team = selector().recommend_team(&[], &["python", "aws"], 2).unwrap();
        assert!(team.members.is_empty());
        assert_eq!(team.coverage_pct, 0.0);
        assert_eq!(team.missing_skills, vec!["python".to_string(), "aws".to_string()]);
    }

    #[test]
    fn test_empty_requirements_is_invalid_input() {
        let required: [&str; 0] = [];
        let err = selector()
            .recommend_team(&pool_of_five(), &required, 3)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_team_size_is_invalid_input() {
        let err = selector()
            .recommend_team(&pool_of_five(), &["python"], 0)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(_)));
    }

    #[test]
    fn test_coverage_is_union_of_complementary_members() {
        let pool = vec![
            candidate("Front", &["react"]),
            candidate("Back", &["python"]),
        ];
        let team = selector().recommend_team(&pool, &["python", "react"], 2).unwrap();
        assert_eq!(team.coverage_pct, 100.0);
        // neither member alone covers both
        assert!(team.members.iter().all(|m| m.result.missing.len() == 1));
    }

    #[test]
    fn test_coverage_monotonic_in_team_size() {
        let pool = pool_of_five();
        let required = ["python", "aws", "terraform"];
        let s = selector();
        let mut previous = 0.0;
        for k in 1..=pool.len() {
            let team = s.recommend_team(&pool, &required, k).unwrap();
            assert!(
                team.coverage_pct >= previous,
                "coverage dropped at k={k}: {} < {previous}",
                team.coverage_pct
            );
            previous = team.coverage_pct;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_screening_advice() {
        let team = selector()
            .recommend_team(&pool_of_five(), &["python", "aws"], 5)
            .unwrap();
        let dee = &team.members[0];
        assert_eq!(dee.advice, ScreeningAdvice::RecommendInterview);
        let eve = team.members.iter().find(|m| m.profile.name == "Eve").unwrap();
        assert_eq!(eve.advice, ScreeningAdvice::UpskillingPlan);
    }
}
