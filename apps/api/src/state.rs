use std::sync::Arc;

use crate::config::Config;
use crate::matching::resume_text::ResumeTextExtractor;
use crate::matching::MatchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Normalizer, ontology, similarity cache and scorers. One per process so the
    /// entanglement cache is shared by every request.
    pub pipeline: Arc<MatchPipeline>,
    /// Pluggable document reader. Default: DocumentTextExtractor.
    pub text_extractor: Arc<dyn ResumeTextExtractor>,
}
