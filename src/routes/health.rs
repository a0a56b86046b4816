use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    model: String,
    synthesis_configured: bool,
}

pub async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        model: state.pipeline.model().to_string(),
        synthesis_configured: state.pipeline.is_configured(),
    })
}
