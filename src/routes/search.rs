use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, warn};

use crate::llm::SynthesisError;
use crate::pipeline::{PipelineError, SynthesisResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
}

/// Run the research pipeline for one query.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SynthesisResult>, ApiError> {
    let query = req.query.unwrap_or_default();
    let result = state.pipeline.run(&query).await?;
    Ok(Json(result))
}

pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            PipelineError::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": self.0.to_string() }),
            ),
            PipelineError::NotConfigured
            | PipelineError::Synthesis(SynthesisError::MissingCredential) => {
                warn!("search rejected: completion service not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": self.0.to_string() }),
                )
            }
            PipelineError::Synthesis(e) => {
                error!(error = %e, "search failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "error": "Failed to process search request",
                        "details": e.to_string(),
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
