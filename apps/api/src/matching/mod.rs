// Resume-to-requirements matching pipeline.
// Implements: skill normalization, ontology, entanglement similarity, extraction,
// candidate scoring, team selection, justification, learning paths.
// Everything below `handlers` is synchronous and free of I/O.

pub mod embedding;
pub mod extractor;
pub mod handlers;
pub mod justification;
pub mod learning_path;
pub mod normalizer;
pub mod ontology;
pub mod pipeline;
pub mod resume_text;
pub mod scorer;
pub mod similarity;
pub mod team;

use thiserror::Error;

/// Canonical, lower-cased skill name.
pub type Skill = String;

/// Failures of the matching core. Only malformed call arguments are errors;
/// "nothing matched" is a normal outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub use pipeline::MatchPipeline;
