use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::models::{DiagramRequest, DiagramUrls, ProductConfig};
use crate::query;
use crate::render::{self, RenderOutcome};
use crate::AppState;

use super::ApiError;

/// Resolve the request's config (with any attached builder structure) and
/// build its URLs for the selected environment
async fn prepare(state: &AppState, req: &DiagramRequest) -> Result<DiagramUrls, ApiError> {
    let endpoint = state
        .config
        .endpoint_for(req.environment)
        .ok_or_else(|| ApiError::bad_request("staging endpoint is not configured"))?;

    let config = resolve_config(state, req).await?;
    Ok(query::diagram_urls(endpoint, &config)?)
}

async fn resolve_config(state: &AppState, req: &DiagramRequest) -> Result<ProductConfig, ApiError> {
    let mut config = req.config.clone();
    if let Some(id) = req.builder_id {
        let session = state.builders.get(id).await?;
        session.editor.structure().attach_to(&mut config)?;
    }
    Ok(config)
}

async fn fetch(state: &AppState, urls: &DiagramUrls) -> Result<RenderOutcome, ApiError> {
    state
        .renderer
        .render(&urls.json_url)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))
}

fn displayed_size(req: &DiagramRequest) -> Option<(f64, f64)> {
    match (req.display_width, req.display_height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

/// Build the diagram, vssx and JSON URLs without calling the API
pub async fn diagram_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiagramRequest>,
) -> Result<Json<DiagramUrls>, ApiError> {
    let urls = prepare(&state, &req).await?;
    Ok(Json(urls))
}

/// Run one render cycle and return the page view. Unknown image types
/// produce 204 with no body.
pub async fn render_diagram(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiagramRequest>,
) -> Result<Response, ApiError> {
    let urls = prepare(&state, &req).await?;
    let outcome = fetch(&state, &urls).await?;

    match render::render_view(&urls, &outcome, displayed_size(&req)) {
        Some(view) => Ok(Json(view).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Run one render cycle and return the image bytes
pub async fn diagram_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiagramRequest>,
) -> Result<Response, ApiError> {
    let urls = prepare(&state, &req).await?;

    match fetch(&state, &urls).await? {
        RenderOutcome::Failed { error } => Err(ApiError::bad_gateway(error)),
        RenderOutcome::Unsupported { .. } => Ok(StatusCode::NO_CONTENT.into_response()),
        RenderOutcome::Rendered { bytes, .. } => {
            Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
        }
    }
}
