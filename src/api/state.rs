//! Application state for the API server

use crate::Config;
use crate::pipeline::NewsPipeline;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the pipeline facade and configuration.
#[derive(Clone)]
pub struct ApiState {
    /// The pipeline facade running the passes
    pub pipeline: Arc<NewsPipeline>,

    /// Configuration (read access; batch size defaults for the pass endpoints)
    pub config: Arc<Config>,
}

impl ApiState {
    /// Create a new ApiState
    pub fn new(pipeline: Arc<NewsPipeline>, config: Arc<Config>) -> Self {
        Self { pipeline, config }
    }
}
