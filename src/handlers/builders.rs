use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::builder::store::BuilderView;
use crate::builder::{AdvancedStructure, BuilderSession, Mutation};
use crate::models::*;
use crate::services::auto_update;
use crate::AppState;

use super::{created, ApiError};

/// Respond with the session view; only applied edits are pushed and re-rendered
fn changed(state: &Arc<AppState>, (session, mutation): (BuilderSession, Mutation)) -> Json<BuilderView> {
    let view = session.view();
    if mutation == Mutation::Applied {
        auto_update::on_builder_changed(state.clone(), session);
    }
    Json(view)
}

/// Start a builder session, empty or seeded from an encoded structure
pub async fn create_builder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBuilderRequest>,
) -> Result<(StatusCode, Json<BuilderView>), ApiError> {
    let view = match req.encoded.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(text) => {
            let structure = AdvancedStructure::decode(req.kind, text)?;
            state.builders.create_with(structure, req.auto_update).await?
        }
        None => state.builders.create(req.kind, req.auto_update).await?,
    };
    Ok(created(view))
}

/// Get a builder session
pub async fn get_builder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BuilderView>, ApiError> {
    let session = state.builders.get(id).await?;
    Ok(Json(session.view()))
}

/// Delete a builder session
pub async fn delete_builder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.builders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle auto-update and attach the form state it renders with
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBuilderSettingsRequest>,
) -> Result<Json<BuilderView>, ApiError> {
    if let Some(config) = &req.config {
        let session = state.builders.get(id).await?;
        // Reject a form the structure can never be attached to
        session.editor.structure().attach_to(&mut config.clone())?;
    }

    let session = state
        .builders
        .update_settings(id, req.auto_update, req.config, req.environment)
        .await?;
    Ok(changed(&state, (session, Mutation::Applied)))
}

/// Append a shelf or chassis
pub async fn add_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Option<Json<AddContainerRequest>>,
) -> Result<Json<BuilderView>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let result = state
        .builders
        .mutate(id, |editor| editor.add_container(req.gen.as_deref()))
        .await?;
    Ok(changed(&state, result))
}

/// Remove a shelf or chassis. Removing container 0 leaves the session unchanged.
pub async fn remove_container(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<BuilderView>, ApiError> {
    let result = state
        .builders
        .mutate(id, |editor| editor.remove_container(index))
        .await?;
    Ok(changed(&state, result))
}

/// Add a datapack or blade config, depending on the session kind
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<BuilderView>, ApiError> {
    let kind = state.builders.get(id).await?.kind();

    let result = match kind {
        BuilderKind::Datapacks => {
            let input: DatapackInput = serde_json::from_value(body)
                .map_err(|e| ApiError::bad_request(format!("invalid datapack: {}", e)))?;
            state
                .builders
                .mutate(id, |editor| editor.add_datapack(index, &input))
                .await?
        }
        BuilderKind::Blades => {
            let input: BladeConfigInput = serde_json::from_value(body)
                .map_err(|e| ApiError::bad_request(format!("invalid blade config: {}", e)))?;
            state
                .builders
                .mutate(id, |editor| editor.add_blade_config(index, &input))
                .await?
        }
    };
    Ok(changed(&state, result))
}

/// Remove one datapack or blade config
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, index, item)): Path<(Uuid, usize, usize)>,
) -> Result<Json<BuilderView>, ApiError> {
    let result = state
        .builders
        .mutate(id, |editor| editor.remove_item(index, item))
        .await?;
    Ok(changed(&state, result))
}
