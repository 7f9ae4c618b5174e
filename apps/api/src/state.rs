use std::sync::Arc;

use crate::analysis::normalize::Normalizer;
use crate::analysis::stopwords::StopWords;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup and handed to every request's normalizer.
    pub stop_words: Arc<StopWords>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stop_words: Arc::new(StopWords::english()),
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(
            Arc::clone(&self.stop_words),
            self.config.stopwords_case_insensitive,
        )
    }
}
