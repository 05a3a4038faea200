//! Skill Ontology: curated knowledge base of related terms, context phrases,
//! surface patterns and pairwise entanglement scores, plus importance tiers.
//!
//! Immutable once built: the similarity cache relies on it never changing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::matching::Skill;

/// Scoring tier of a required skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    /// Credit given for an explicit match of a skill at this tier.
    pub fn weight(self) -> f64 {
        match self {
            Importance::Critical => 3.0,
            Importance::High => 2.0,
            Importance::Medium => 1.0,
            Importance::Low => 0.5,
        }
    }
}

/// Ontology knowledge about one skill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillOntologyEntry {
    pub related: BTreeSet<Skill>,
    pub contexts: BTreeSet<String>,
    pub patterns: BTreeSet<String>,
    /// Directed closeness scores; lookups check both directions.
    pub entanglement: BTreeMap<Skill, f64>,
}

impl SkillOntologyEntry {
    pub fn new(
        related: &[&str],
        contexts: &[&str],
        patterns: &[&str],
        entanglement: &[(&str, f64)],
    ) -> Self {
        Self {
            related: related.iter().map(|s| s.to_string()).collect(),
            contexts: contexts.iter().map(|s| s.to_string()).collect(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            entanglement: entanglement
                .iter()
                .map(|(s, v)| (s.to_string(), v.clamp(0.0, 1.0)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillOntology {
    entries: HashMap<Skill, SkillOntologyEntry>,
    importance: HashMap<Skill, Importance>,
}

impl SkillOntology {
    /// An ontology with no entries and no importance table.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, skill: &str, entry: SkillOntologyEntry) -> Self {
        self.entries.insert(skill.to_string(), entry);
        self
    }

    pub fn with_importance(mut self, skill: &str, importance: Importance) -> Self {
        self.importance.insert(skill.to_string(), importance);
        self
    }

    pub fn entry(&self, skill: &str) -> Option<&SkillOntologyEntry> {
        self.entries.get(skill)
    }

    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &SkillOntologyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Importance tier, defaulting to `Medium` for unregistered skills.
    pub fn importance(&self, skill: &str) -> Importance {
        self.importance.get(skill).copied().unwrap_or_default()
    }

    /// Skills with a registered importance tier.
    pub fn ranked_skills(&self) -> impl Iterator<Item = &str> {
        self.importance.keys().map(String::as_str)
    }

    /// Stored entanglement for the pair. When both directions are stored the
    /// larger one wins, so the result never depends on argument order.
    pub fn direct_entanglement(&self, a: &str, b: &str) -> Option<f64> {
        let forward = self.entry(a).and_then(|e| e.entanglement.get(b)).copied();
        let backward = self.entry(b).and_then(|e| e.entanglement.get(a)).copied();
        match (forward, backward) {
            (Some(f), Some(r)) => Some(f.max(r)),
            (f, r) => f.or(r),
        }
    }

    /// True if either skill lists the other as related.
    pub fn are_related(&self, a: &str, b: &str) -> bool {
        self.entry(a).is_some_and(|e| e.related.contains(b))
            || self.entry(b).is_some_and(|e| e.related.contains(a))
    }

    /// True if a registered pattern of either skill occurs inside the other's name.
    pub fn pattern_overlap(&self, a: &str, b: &str) -> bool {
        let contains = |owner: &str, other: &str| {
            self.entry(owner)
                .is_some_and(|e| e.patterns.iter().any(|p| other.contains(p.as_str())))
        };
        contains(a, b) || contains(b, a)
    }

    /// True if a context phrase of either skill occurs inside the other's name.
    pub fn context_overlap(&self, a: &str, b: &str) -> bool {
        let contains = |owner: &str, other: &str| {
            self.entry(owner)
                .is_some_and(|e| e.contexts.iter().any(|c| other.contains(c.as_str())))
        };
        contains(a, b) || contains(b, a)
    }
}

/// The built-in hiring ontology.
pub fn default_ontology() -> SkillOntology {
    SkillOntology::empty()
        .with_entry(
            "react",
            SkillOntologyEntry::new(
                &["javascript", "frontend", "redux", "hooks", "jsx"],
                &["web app", "spa", "component-based", "virtual dom"],
                &["react.js", "reactjs", "react native"],
                &[("javascript", 0.95), ("angular", 0.65), ("vue", 0.7)],
            ),
        )
        .with_entry(
            "python",
            SkillOntologyEntry::new(
                &["django", "flask", "data science", "pandas", "numpy"],
                &["scripting", "automation", "machine learning", "ai"],
                &["python 3", "python scripting"],
                &[
                    ("data analysis", 0.85),
                    ("machine learning", 0.9),
                    ("automation", 0.75),
                ],
            ),
        )
        .with_entry(
            "aws",
            SkillOntologyEntry::new(
                &["ec2", "s3", "lambda", "cloudformation", "cloud"],
                &["cloud infrastructure", "serverless", "cloud deployment"],
                &["amazon web services", "aws cloud"],
                &[("devops", 0.7), ("docker", 0.6), ("kubernetes", 0.6)],
            ),
        )
        .with_entry(
            "machine learning",
            SkillOntologyEntry::new(
                &["deep learning", "tensorflow", "pytorch", "scikit-learn"],
                &["model training", "predictive model", "neural network"],
                &["machine-learning", "ml engineer"],
                &[("data analysis", 0.75), ("python", 0.9)],
            ),
        )
        .with_entry(
            "java",
            SkillOntologyEntry::new(
                &["spring", "hibernate", "jvm", "maven"],
                &["enterprise application", "backend service"],
                &["java 8", "java 11", "j2ee"],
                &[("kotlin", 0.8), ("scala", 0.7), ("c++", 0.5)],
            ),
        )
        .with_entry(
            "kubernetes",
            SkillOntologyEntry::new(
                &["docker", "helm", "containers"],
                &["container orchestration", "cluster management"],
                &["k8s"],
                &[("docker", 0.8), ("devops", 0.75)],
            ),
        )
        .with_entry(
            "docker",
            SkillOntologyEntry::new(
                &["containers", "docker compose"],
                &["containerization", "containerized"],
                &["dockerfile", "docker-compose"],
                &[("devops", 0.7)],
            ),
        )
        .with_importance("python", Importance::Critical)
        .with_importance("aws", Importance::High)
        .with_importance("machine learning", Importance::High)
        .with_importance("c++", Importance::High)
        .with_importance("java", Importance::High)
        .with_importance("react", Importance::Medium)
        .with_importance("devops", Importance::Medium)
        .with_importance("data analysis", Importance::Medium)
        .with_importance("docker", Importance::Low)
        .with_importance("kubernetes", Importance::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_weights() {
        assert_eq!(Importance::Critical.weight(), 3.0);
        assert_eq!(Importance::High.weight(), 2.0);
        assert_eq!(Importance::Medium.weight(), 1.0);
        assert_eq!(Importance::Low.weight(), 0.5);
    }

    #[test]
    fn test_unregistered_skill_defaults_to_medium() {
        let ontology = default_ontology();
        assert_eq!(ontology.importance("haskell"), Importance::Medium);
        assert_eq!(ontology.importance("python"), Importance::Critical);
    }

    #[test]
    fn test_direct_entanglement_checks_both_directions() {
        let ontology = default_ontology();
        assert_eq!(ontology.direct_entanglement("react", "javascript"), Some(0.95));
        assert_eq!(ontology.direct_entanglement("javascript", "react"), Some(0.95));
        assert_eq!(ontology.direct_entanglement("react", "rust"), None);
    }

    #[test]
    fn test_direct_entanglement_prefers_larger_direction() {
        let ontology = SkillOntology::empty()
            .with_entry("a", SkillOntologyEntry::new(&[], &[], &[], &[("b", 0.9)]))
            .with_entry("b", SkillOntologyEntry::new(&[], &[], &[], &[("a", 0.3)]));
        assert_eq!(ontology.direct_entanglement("a", "b"), Some(0.9));
        assert_eq!(ontology.direct_entanglement("b", "a"), Some(0.9));
    }

    #[test]
    fn test_pattern_overlap() {
        let ontology = default_ontology();
        assert!(ontology.pattern_overlap("react", "react native"));
        assert!(ontology.pattern_overlap("react native", "react"));
        assert!(!ontology.pattern_overlap("react", "vue"));
    }

    #[test]
    fn test_related_and_context_overlap_are_symmetric() {
        let ontology = default_ontology();
        assert!(ontology.are_related("python", "pandas"));
        assert!(ontology.are_related("pandas", "python"));
        assert!(ontology.context_overlap("python", "ai research"));
        assert!(ontology.context_overlap("ai research", "python"));
    }

    #[test]
    fn test_entanglement_values_are_clamped() {
        let entry = SkillOntologyEntry::new(&[], &[], &[], &[("x", 1.7), ("y", -0.2)]);
        assert_eq!(entry.entanglement["x"], 1.0);
        assert_eq!(entry.entanglement["y"], 0.0);
    }
}
