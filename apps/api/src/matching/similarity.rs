//! Similarity Engine: closeness ("entanglement") between two skills in [0,1].
//!
//! Resolution order, first hit wins:
//! 1. direct ontology entanglement, either direction
//! 2. pattern containment → `PATTERN_MATCH_SCORE`
//! 3. embedding cosine similarity, boosted when the ontology relates the pair
//!
//! Results are memoized per unordered pair. The engine is shared across request
//! handlers, so the cache is lock-protected; values are pure functions of the
//! ontology and embedder, so a racing duplicate computation is harmless.
//!
//! Only skill-to-skill lookups are memoized. Free-text tokens and caller-supplied
//! pairs go through `entanglement_uncached`, and the cache stops accepting new
//! pairs at `DEFAULT_CACHE_CAPACITY`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::embedding::{cosine_similarity, is_degenerate, SkillEmbedder};
use crate::matching::ontology::SkillOntology;

/// Score assigned when a surface pattern of one skill occurs in the other.
pub const PATTERN_MATCH_SCORE: f64 = 0.9;

/// Upper bound on memoized pairs per engine.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Tunable knobs of the similarity and scoring stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityParams {
    /// A required skill counts as an inferred match above this score.
    pub entanglement_threshold: f64,
    /// Multiplier applied when the ontology lists the pair as related.
    pub superposition_boost: f64,
    /// Multiplier applied when a context phrase of one skill occurs in the other.
    pub context_amplifier: f64,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            entanglement_threshold: 0.65,
            superposition_boost: 1.3,
            context_amplifier: 1.2,
        }
    }
}

/// Memo of entanglement scores keyed by unordered skill pair.
///
/// Write-once: the first value stored for a pair is the one every caller sees.
/// Once `capacity` pairs are stored, further pairs are computed but not kept.
#[derive(Debug)]
pub struct EntanglementCache {
    scores: RwLock<HashMap<(String, String), f64>>,
    capacity: usize,
}

impl Default for EntanglementCache {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_CACHE_CAPACITY)
    }
}

impl EntanglementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            scores: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.scores.read().get(&pair_key(a, b)).copied()
    }

    /// Stores `score` unless the pair is already cached; returns the cached value.
    /// A full cache returns `score` without storing it.
    pub fn insert_if_absent(&self, a: &str, b: &str, score: f64) -> f64 {
        let key = pair_key(a, b);
        let mut scores = self.scores.write();
        if let Some(existing) = scores.get(&key) {
            return *existing;
        }
        if scores.len() >= self.capacity {
            return score;
        }
        scores.insert(key, score);
        score
    }

    pub fn len(&self) -> usize {
        self.scores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub struct SimilarityEngine {
    ontology: Arc<SkillOntology>,
    embedder: Box<dyn SkillEmbedder>,
    params: SimilarityParams,
    cache: EntanglementCache,
}

impl SimilarityEngine {
    pub fn new(
        ontology: Arc<SkillOntology>,
        embedder: Box<dyn SkillEmbedder>,
        params: SimilarityParams,
    ) -> Self {
        debug!(
            "Similarity engine using {}-dimensional skill embeddings",
            embedder.dimension()
        );
        Self {
            ontology,
            embedder,
            params,
            cache: EntanglementCache::new(),
        }
    }

    pub fn params(&self) -> SimilarityParams {
        self.params
    }

    pub fn ontology(&self) -> &SkillOntology {
        &self.ontology
    }

    pub fn cache(&self) -> &EntanglementCache {
        &self.cache
    }

    /// Symmetric, memoized closeness between two canonical skills.
    pub fn entanglement(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if let Some(cached) = self.cache.get(a, b) {
            return cached;
        }
        let score = self.resolve(a, b);
        debug!("entanglement({a}, {b}) = {score:.3}");
        self.cache.insert_if_absent(a, b, score)
    }

    /// Same score as `entanglement`, but never adds to the cache. Used for
    /// resume tokens and other open-ended input.
    pub fn entanglement_uncached(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        match self.cache.get(a, b) {
            Some(cached) => cached,
            None => self.resolve(a, b),
        }
    }

    fn resolve(&self, a: &str, b: &str) -> f64 {
        // Fixed argument order keeps the result independent of call order.
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        if let Some(direct) = self.ontology.direct_entanglement(a, b) {
            return direct;
        }
        if self.ontology.pattern_overlap(a, b) {
            return PATTERN_MATCH_SCORE;
        }
        self.embedding_similarity(a, b)
    }

    fn embedding_similarity(&self, a: &str, b: &str) -> f64 {
        let va = self.embedder.embed(a);
        let vb = self.embedder.embed(b);
        if is_degenerate(&va) || is_degenerate(&vb) {
            return 0.0;
        }
        let base = cosine_similarity(&va, &vb);
        let boosted = if self.ontology.are_related(a, b) {
            base * self.params.superposition_boost
        } else if self.ontology.context_overlap(a, b) {
            base * self.params.context_amplifier
        } else {
            base
        };
        boosted.clamp(0.0, 1.0)
    }
}
