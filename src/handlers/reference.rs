use axum::{extract::State, Json};
use std::sync::Arc;

use crate::reference::ReferenceData;
use crate::AppState;

/// Full reference tables
pub async fn get_reference(State(state): State<Arc<AppState>>) -> Json<ReferenceData> {
    Json(state.reference.as_ref().clone())
}

/// csize choices in numeric order
pub async fn list_csizes(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.reference.csizes())
}
