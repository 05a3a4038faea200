//! Match pipeline: wires the matching components around one shared ontology
//! and one similarity cache.
//!
//! Flow: raw text → SkillExtractor → CandidateProfile → CandidateScorer →
//!       MatchResult → (TeamSelector | JustificationComposer).

use std::sync::Arc;

use tracing::info;

use crate::matching::embedding::HashedTrigramEmbedder;
use crate::matching::extractor::{CandidateProfile, SkillExtractor};
use crate::matching::justification::{Justification, JustificationComposer};
use crate::matching::normalizer::SkillNormalizer;
use crate::matching::ontology::{default_ontology, SkillOntology};
use crate::matching::scorer::{CandidateScorer, MatchResult};
use crate::matching::similarity::{SimilarityEngine, SimilarityParams};
use crate::matching::team::{TeamRecommendation, TeamSelector};
use crate::matching::{MatchError, Skill};

pub struct MatchPipeline {
    pub normalizer: Arc<SkillNormalizer>,
    pub similarity: Arc<SimilarityEngine>,
    pub extractor: SkillExtractor,
    pub scorer: Arc<CandidateScorer>,
    pub team_selector: TeamSelector,
    pub justifier: JustificationComposer,
}

impl MatchPipeline {
    /// Built-in ontology and alias table with the given parameters.
    /// `seed` makes justification phrasing reproducible.
    pub fn new(params: SimilarityParams, seed: Option<u64>) -> Self {
        Self::with_components(
            SkillNormalizer::default(),
            default_ontology(),
            params,
            seed,
        )
    }

    pub fn with_components(
        normalizer: SkillNormalizer,
        ontology: SkillOntology,
        params: SimilarityParams,
        seed: Option<u64>,
    ) -> Self {
        let normalizer = Arc::new(normalizer);
        let ontology = Arc::new(ontology);
        let similarity = Arc::new(SimilarityEngine::new(
            ontology.clone(),
            Box::new(HashedTrigramEmbedder::default()),
            params,
        ));
        let extractor = SkillExtractor::new(normalizer.clone(), similarity.clone());
        let scorer = Arc::new(CandidateScorer::new(normalizer.clone(), similarity.clone()));
        let team_selector = TeamSelector::new(normalizer.clone(), scorer.clone());
        let justifier = match seed {
            Some(seed) => JustificationComposer::with_seed(ontology, seed),
            None => JustificationComposer::new(ontology),
        };

        info!(
            "Match pipeline ready (threshold={}, superposition_boost={}, context_amplifier={})",
            params.entanglement_threshold, params.superposition_boost, params.context_amplifier
        );

        Self {
            normalizer,
            similarity,
            extractor,
            scorer,
            team_selector,
            justifier,
        }
    }

    pub fn params(&self) -> SimilarityParams {
        self.similarity.params()
    }

    /// Normalizes a raw requirement list, rejecting an empty result.
    pub fn required_skills<S: AsRef<str>>(&self, raw: &[S]) -> Result<Vec<Skill>, MatchError> {
        let required = self.normalizer.normalize_all(raw);
        if required.is_empty() {
            return Err(MatchError::InvalidInput(
                "required_skills cannot be empty".to_string(),
            ));
        }
        Ok(required)
    }

    /// Builds a profile from resume text plus any explicitly listed skills.
    pub fn profile<S: AsRef<str>>(
        &self,
        name: &str,
        raw_text: &str,
        listed_skills: &[S],
        required: &[Skill],
    ) -> CandidateProfile {
        let mut profile = self.extractor.extract(name, raw_text, required);
        for skill in self.normalizer.normalize_all(listed_skills) {
            profile.inferred_skills.remove(&skill);
            profile.explicit_skills.insert(skill);
        }
        profile
    }

    pub fn score(
        &self,
        profile: &CandidateProfile,
        required: &[Skill],
    ) -> Result<MatchResult, MatchError> {
        self.scorer.score(&profile.all_skills(), required)
    }

    pub fn justify(
        &self,
        profile: &CandidateProfile,
        required: &[Skill],
    ) -> Result<(MatchResult, Justification), MatchError> {
        let result = self.score(profile, required)?;
        let justification = self.justifier.justify(&profile.name, &result);
        Ok((result, justification))
    }

    pub fn recommend_team(
        &self,
        pool: &[CandidateProfile],
        required: &[Skill],
        team_size: usize,
    ) -> Result<TeamRecommendation, MatchError> {
        self.team_selector.recommend_team(pool, required, team_size)
    }

    pub fn entanglement(&self, a: &str, b: &str) -> (Skill, Skill, f64) {
        let a = self.normalizer.normalize(a);
        let b = self.normalizer.normalize(b);
        let score = self.similarity.entanglement_uncached(&a, &b);
        (a, b, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::justification::RecommendationTier;

    fn pipeline() -> MatchPipeline {
        MatchPipeline::new(SimilarityParams::default(), Some(42))
    }

    #[test]
    fn test_resume_text_to_justification() {
        let p = pipeline();
        let required = p.required_skills(&["Python", "AWS", "React"]).unwrap();
        let profile = p.profile(
            "Jane Doe",
            "Senior engineer. Built Django services deployed on Amazon Web Services.",
            &[] as &[&str],
            &required,
        );
        let (result, justification) = p.justify(&profile, &required).unwrap();
        assert!(result.is_matched("python"));
        assert!(result.is_matched("aws"));
        assert_eq!(result.missing, vec!["react".to_string()]);
        assert_eq!(
            justification.recommendation_tier,
            RecommendationTier::StrongShortlist
        );
        assert_eq!(justification.normalized_score, 10.0);
    }

    #[test]
    fn test_missing_text_reports_everything_missing() {
        let p = pipeline();
        let required = p.required_skills(&["python", "aws"]).unwrap();
        let profile = p.profile("Empty", "", &[] as &[&str], &required);
        let result = p.score(&profile, &required).unwrap();
        assert!(result.matched.is_empty());
        assert_eq!(result.missing, required);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_listed_skills_are_explicit() {
        let p = pipeline();
        let required = p.required_skills(&["go"]).unwrap();
        let profile = p.profile("Gopher", "", &["Go"], &required);
        assert!(profile.explicit_skills.contains("go"));
        let result = p.score(&profile, &required).unwrap();
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_blank_requirements_rejected() {
        let p = pipeline();
        assert!(matches!(
            p.required_skills(&["  ", ""]),
            Err(MatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_long_resumes_do_not_grow_the_cache() {
        let p = pipeline();
        let required = p.required_skills(&["python"]).unwrap();
        let before = p.similarity.cache().len();
        for batch in 0..3 {
            let filler: Vec<String> = (0..500).map(|i| format!("tok{batch}x{i}")).collect();
            let text = format!("Owned test automation. {}", filler.join(" "));
            let profile = p.profile("Kim", &text, &[] as &[&str], &required);
            assert!(profile.inferred_skills.contains("python"));
            assert_eq!(p.similarity.cache().len(), before);
        }
    }

    #[test]
    fn test_entanglement_lookup_is_not_memoized() {
        let p = pipeline();
        let _ = p.entanglement("some-caller-skill", "another-caller-skill");
        assert!(p.similarity.cache().is_empty());
    }

    #[test]
    fn test_entanglement_normalizes_inputs() {
        let p = pipeline();
        let (a, b, score) = p.entanglement("ReactJS", "JavaScript");
        assert_eq!(a, "react");
        assert_eq!(b, "javascript");
        assert_eq!(score, 0.95);
    }
}
