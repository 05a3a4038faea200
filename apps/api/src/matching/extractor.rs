//! Skill Extractor: turns resume text into a `CandidateProfile`.
//!
//! Explicit skills come from word-bounded phrase containment against a known
//! vocabulary; inferred skills come from ontology context phrases backed by a
//! token that is entangled with the skill. No NLP beyond that.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::embedding::tokenize;
use crate::matching::normalizer::SkillNormalizer;
use crate::matching::similarity::SimilarityEngine;
use crate::matching::Skill;

/// A token must be at least this entangled with an ontology skill for a
/// context phrase to imply that skill.
pub const CONTEXT_INFERENCE_THRESHOLD: f64 = 0.7;

/// Skills known about one candidate. Built per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    /// Extracted resume text; empty when extraction failed or nothing was supplied.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_text: String,
    pub explicit_skills: BTreeSet<Skill>,
    pub inferred_skills: BTreeSet<Skill>,
}

impl CandidateProfile {
    /// A profile from an explicit skill list (already normalized).
    pub fn with_skills(name: impl Into<String>, skills: impl IntoIterator<Item = Skill>) -> Self {
        Self {
            name: name.into(),
            raw_text: String::new(),
            explicit_skills: skills.into_iter().collect(),
            inferred_skills: BTreeSet::new(),
        }
    }

    /// Union of explicit and inferred skills, as seen by the scorer.
    pub fn all_skills(&self) -> BTreeSet<Skill> {
        self.explicit_skills
            .union(&self.inferred_skills)
            .cloned()
            .collect()
    }
}

pub struct SkillExtractor {
    normalizer: Arc<SkillNormalizer>,
    similarity: Arc<SimilarityEngine>,
}

impl SkillExtractor {
    pub fn new(normalizer: Arc<SkillNormalizer>, similarity: Arc<SimilarityEngine>) -> Self {
        Self {
            normalizer,
            similarity,
        }
    }

    /// Builds a profile from raw resume text. `required` skills are searched for
    /// in addition to the built-in vocabulary.
    pub fn extract(&self, name: &str, raw_text: &str, required: &[Skill]) -> CandidateProfile {
        let text = raw_text.to_lowercase();
        if text.trim().is_empty() {
            return CandidateProfile {
                name: name.to_string(),
                raw_text: raw_text.to_string(),
                ..CandidateProfile::default()
            };
        }

        let explicit_skills: BTreeSet<Skill> = self
            .vocabulary(required)
            .into_iter()
            .filter(|(term, _)| contains_phrase(&text, term))
            .map(|(_, skill)| skill)
            .collect();

        let inferred_skills = self
            .infer_from_context(&text)
            .into_iter()
            .filter(|skill| !explicit_skills.contains(skill))
            .collect();

        CandidateProfile {
            name: name.to_string(),
            raw_text: raw_text.to_string(),
            explicit_skills,
            inferred_skills,
        }
    }

    /// Searchable surface term → canonical skill it stands for.
    fn vocabulary(&self, required: &[Skill]) -> BTreeMap<String, Skill> {
        let ontology = self.similarity.ontology();
        let mut terms: BTreeSet<String> = required.iter().cloned().collect();
        terms.extend(ontology.ranked_skills().map(str::to_string));
        terms.extend(ontology.skills().map(str::to_string));
        terms.extend(self.normalizer.aliases().map(|(alias, _)| alias.to_string()));

        let mut vocabulary: BTreeMap<String, Skill> = terms
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| {
                let skill = self.normalizer.normalize(&t);
                (t, skill)
            })
            .collect();
        // Patterns stand for the skill that owns them.
        for (skill, entry) in ontology.entries() {
            for pattern in &entry.patterns {
                vocabulary
                    .entry(pattern.clone())
                    .or_insert_with(|| self.normalizer.normalize(skill));
            }
        }
        vocabulary
    }

    fn infer_from_context(&self, text: &str) -> BTreeSet<Skill> {
        let tokens: HashSet<String> = tokenize(text).collect();
        let ontology = self.similarity.ontology();
        ontology
            .entries()
            .filter(|(_, entry)| entry.contexts.iter().any(|c| contains_phrase(text, c)))
            .filter(|(skill, _)| {
                tokens.iter().any(|token| {
                    self.similarity.entanglement_uncached(token, skill)
                        > CONTEXT_INFERENCE_THRESHOLD
                })
            })
            .map(|(skill, _)| self.normalizer.normalize(skill))
            .collect()
    }
}

/// Derives a display name from a resume file name: `jane_doe.pdf` → `Jane Doe`.
pub fn candidate_name_from_file(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let name = stem
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    if name.is_empty() {
        "Candidate".to_string()
    } else {
        name
    }
}

/// `phrase` occurs in `text` with no alphanumeric character touching either end.
/// Both sides are expected to be lower-cased already.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
