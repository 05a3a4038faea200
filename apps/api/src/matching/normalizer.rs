//! Skill Normalizer: maps raw skill strings and aliases onto canonical skill names.
//!
//! Every comparison in the matcher happens on canonical names, so both sides
//! (candidate skills and requirement lists) must pass through `normalize` first.

use std::collections::{HashMap, HashSet};

use crate::matching::Skill;

/// Surface form → canonical skill.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("python3", "python"),
    ("python2", "python"),
    ("pandas", "python"),
    ("numpy", "python"),
    ("django", "python"),
    ("flask", "python"),
    ("cplusplus", "c++"),
    ("cpp", "c++"),
    ("java8", "java"),
    ("java11", "java"),
    ("j2ee", "java"),
    ("spring", "java"),
    ("hibernate", "java"),
    ("tensorflow", "machine learning"),
    ("pytorch", "machine learning"),
    ("scikit-learn", "machine learning"),
    ("ml", "machine learning"),
    ("reactjs", "react"),
    ("aws cloud", "aws"),
    ("amazon web services", "aws"),
    ("k8s", "kubernetes"),
];

#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    aliases: HashMap<String, Skill>,
    targets: HashSet<Skill>,
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

impl SkillNormalizer {
    /// Builds a normalizer from `(alias, canonical)` pairs. Both sides are lower-cased.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let aliases: HashMap<String, Skill> = pairs
            .into_iter()
            .map(|(alias, canonical)| {
                (
                    alias.trim().to_lowercase(),
                    canonical.trim().to_lowercase(),
                )
            })
            .collect();
        let targets = aliases.values().cloned().collect();
        Self { aliases, targets }
    }

    /// Lower-cases and trims `raw`, then resolves it through the alias table.
    /// Unknown names are their own canonical form.
    pub fn normalize(&self, raw: &str) -> Skill {
        let key = raw.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Normalizes a list, dropping blanks and collapsing duplicates to their first occurrence.
    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S]) -> Vec<Skill> {
        let mut seen = HashSet::new();
        raw.iter()
            .map(|s| self.normalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    /// True if at least one alias resolves to `skill`.
    pub fn is_alias_target(&self, skill: &str) -> bool {
        self.targets.contains(skill)
    }

    /// All alias surface forms, used by the extractor as search vocabulary.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}
