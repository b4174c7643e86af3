use std::sync::Arc;

use crate::{engine::ReasoningEngine, services::IntentParser};

/// Shared application state
///
/// The knowledge base is one process-wide store; every request sees the
/// facts added by earlier ones.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn ReasoningEngine>,
    pub parser: Arc<IntentParser>,
    /// Subject assumed when a question request names no user
    pub default_subject: String,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        parser: IntentParser,
        default_subject: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            parser: Arc::new(parser),
            default_subject: default_subject.into(),
        }
    }
}
