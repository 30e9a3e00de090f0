use std::sync::Arc;

use crate::cache::OptimizationCache;
use crate::context::ContextStore;
use crate::tailoring::TailoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TailoringPipeline>,
    pub context: ContextStore,
    pub cache: OptimizationCache,
}

impl AppState {
    /// The stores are the pipeline's own, so handlers and the pipeline see the same data.
    pub fn new(pipeline: TailoringPipeline) -> Self {
        Self {
            context: pipeline.context().clone(),
            cache: pipeline.cache().clone(),
            pipeline: Arc::new(pipeline),
        }
    }
}
