//! Skill embeddings used by the similarity fallback.
//!
//! `SkillEmbedder` is the seam for a real embedding model. The default
//! `HashedTrigramEmbedder` is pure Rust and deterministic: each token is
//! expanded into boundary-marked character trigrams, hashed into a fixed
//! number of buckets.

/// Tokens that carry no skill signal on their own.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "in", "of", "on", "or", "the", "to", "with",
];

/// Default vector width for the hashed embedder.
pub const DEFAULT_DIMENSION: usize = 256;

/// Produces a vector representation of a skill name.
///
/// An all-zero vector means "no signal"; the similarity engine maps it to 0.0.
pub trait SkillEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct HashedTrigramEmbedder {
    dimension: usize,
}

impl Default for HashedTrigramEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashedTrigramEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl SkillEmbedder for HashedTrigramEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in tokenize(text) {
            let marked: Vec<char> = std::iter::once('^')
                .chain(token.chars())
                .chain(std::iter::once('$'))
                .collect();
            for window in marked.windows(3) {
                let trigram: String = window.iter().collect();
                let bucket = (fnv1a(trigram.as_bytes()) % self.dimension as u64) as usize;
                vector[bucket] += 1.0;
            }
        }
        vector
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Lower-cased word tokens; `+` and `#` stay attached so "c++" and "c#" survive.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

/// Cosine similarity clamped to [0,1]. Zero-norm inputs yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

pub fn is_degenerate(vector: &[f32]) -> bool {
    vector.iter().all(|x| *x == 0.0)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
