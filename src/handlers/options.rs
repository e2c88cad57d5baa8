use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{option_tables, OptionTables, VisibilityRequest};
use crate::query::visible_fields;
use crate::AppState;

/// Option tables for all three tabs, with csizes from the reference data
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionTables> {
    Json(option_tables(&state.reference.csizes()))
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub fields: Vec<&'static str>,
}

/// Which fields the tab shows for a model/face pair
pub async fn get_visibility(Json(req): Json<VisibilityRequest>) -> Json<VisibilityResponse> {
    let fields = visible_fields(req.family, &req.model, &req.face);
    Json(VisibilityResponse {
        fields: fields.into_iter().collect(),
    })
}
