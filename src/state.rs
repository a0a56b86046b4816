use std::sync::Arc;

use crate::pipeline::Pipeline;

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}
