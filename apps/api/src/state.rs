use std::sync::Arc;

use crate::analysis::scoring::MatchScorer;
use crate::config::Config;
use crate::extraction::DocumentExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable scorer. Default: KeywordMatchScorer over the built-in skill catalog.
    pub scorer: Arc<dyn MatchScorer>,
    /// Pluggable document reader. Default: DocxExtractor.
    pub extractor: Arc<dyn DocumentExtractor>,
}
