use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::builder::BuilderSession;
use crate::query;
use crate::render;
use crate::AppState;

/// Handle a changed builder session.
/// Pushes the new structure to WebSocket clients and, when auto-update is
/// on and form state is attached, re-renders the diagram and pushes the
/// result tagged with the session revision.
pub fn on_builder_changed(state: Arc<AppState>, session: BuilderSession) -> JoinHandle<()> {
    tokio::spawn(async move {
        state.ws_hub.broadcast_builder_updated(&session.view()).await;

        if !session.auto_update {
            return;
        }
        let Some(mut config) = session.config.clone() else {
            tracing::debug!("Builder {} has auto-update on but no form state", session.id);
            return;
        };

        let revision = session.revision;
        let Some(endpoint) = state.config.endpoint_for(session.environment) else {
            tracing::warn!("Auto-update for builder {} skipped: {:?} endpoint not configured", session.id, session.environment);
            return;
        };

        if let Err(e) = session.editor.structure().attach_to(&mut config) {
            state
                .ws_hub
                .broadcast_render_failed(session.id, revision, &e.to_string())
                .await;
            return;
        }

        let urls = match query::diagram_urls(endpoint, &config) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Failed to build URL for builder {}: {}", session.id, e);
                return;
            }
        };

        match state.renderer.render(&urls.json_url).await {
            Ok(outcome) => {
                if let Some(view) = render::render_view(&urls, &outcome, None) {
                    state
                        .ws_hub
                        .broadcast_render_completed(session.id, revision, view)
                        .await;
                }
            }
            Err(e) => {
                tracing::warn!("Auto-update render for builder {} failed: {}", session.id, e);
                state
                    .ws_hub
                    .broadcast_render_failed(session.id, revision, &e.to_string())
                    .await;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderStore;
    use crate::config::Config;
    use crate::models::{BuilderKind, DatapackInput, ProductConfig};
    use crate::reference::ReferenceData;
    use crate::render::tests::{fake_api, png_header, spawn_api};
    use crate::render::RenderClient;
    use crate::ws::Hub;
    use base64::Engine;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::sync::broadcast;

    fn state(api_endpoint: &str) -> Arc<AppState> {
        let mut config = Config::for_tests();
        config.api_endpoint = api_endpoint.to_string();
        Arc::new(AppState {
            config,
            reference: Arc::new(ReferenceData::load("").unwrap()),
            builders: BuilderStore::new(),
            renderer: RenderClient::new(5).unwrap(),
            ws_hub: Arc::new(Hub::new()),
        })
    }

    fn fa_config() -> ProductConfig {
        serde_json::from_value(json!({"family": "fa", "model": "fa-x70r4", "protocol": "fc", "face": "front"}))
            .unwrap()
    }

    /// Datapacks session at revision 1 with the given settings
    async fn open_session(state: &AppState, auto_update: bool, config: Option<ProductConfig>) -> BuilderSession {
        let view = state.builders.create(BuilderKind::Datapacks, auto_update).await.unwrap();
        let input = DatapackInput {
            fm_size: "11TB".to_string(),
            fm_count: 10,
            ..Default::default()
        };
        state
            .builders
            .mutate(view.id, |editor| editor.add_datapack(0, &input))
            .await
            .unwrap();
        state.builders.update_settings(view.id, None, config, None).await.unwrap()
    }

    async fn next_event(rx: &mut broadcast::Receiver<String>) -> Value {
        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        serde_json::from_str(&msg).unwrap()
    }

    #[tokio::test]
    async fn test_render_completed_tagged_with_revision() {
        let payload = base64::engine::general_purpose::STANDARD.encode(png_header(64, 32));
        let base = spawn_api(|_| {
            fake_api(json!({
                "error": null,
                "image": payload,
                "image_type": "png",
                "ports": [{"loc": [8, 8], "name": "eth0"}],
            }))
        })
        .await;
        let state = state(&format!("{}/rackdiagram?", base));
        let mut rx = state.ws_hub.listen().await;

        let session = open_session(&state, true, Some(fa_config())).await;
        on_builder_changed(state.clone(), session).await.unwrap();

        let updated = next_event(&mut rx).await;
        assert_eq!(updated["type"], "builder_updated");
        assert_eq!(updated["payload"]["revision"], 1);
        assert!(updated["payload"]["encoded"]
            .as_str()
            .unwrap()
            .starts_with("((datapacks:((fm_size:11TB,fm_count:10"));

        let completed = next_event(&mut rx).await;
        assert_eq!(completed["type"], "render_completed");
        assert_eq!(completed["payload"]["revision"], 1);
        let view = &completed["payload"]["view"];
        assert_eq!(view["image_type"], "png");
        assert_eq!(view["natural_width"], 64);
        assert_eq!(view["natural_height"], 32);
        assert_eq!(view["hotspots"].as_array().unwrap().len(), 1);
        assert!(view["url"].as_str().unwrap().contains("&datapacksv2="));
    }

    #[tokio::test]
    async fn test_auto_update_off_only_pushes_structure() {
        let state = state("http://127.0.0.1:1/rackdiagram?");
        let mut rx = state.ws_hub.listen().await;

        let session = open_session(&state, false, Some(fa_config())).await;
        on_builder_changed(state.clone(), session).await.unwrap();
        assert_eq!(next_event(&mut rx).await["type"], "builder_updated");
        assert!(rx.try_recv().is_err());

        // Auto-update on but no form state attached
        let session = open_session(&state, true, None).await;
        on_builder_changed(state.clone(), session).await.unwrap();
        assert_eq!(next_event(&mut rx).await["type"], "builder_updated");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_attach_mismatch_reports_render_failed() {
        let state = state("http://127.0.0.1:1/rackdiagram?");
        let mut rx = state.ws_hub.listen().await;

        let fb: ProductConfig =
            serde_json::from_value(json!({"family": "fb", "chassis": "1", "face": "front", "direction": "up"}))
                .unwrap();
        let session = open_session(&state, true, Some(fb)).await;
        on_builder_changed(state.clone(), session).await.unwrap();

        assert_eq!(next_event(&mut rx).await["type"], "builder_updated");
        let failed = next_event(&mut rx).await;
        assert_eq!(failed["type"], "render_failed");
        assert_eq!(failed["payload"]["revision"], 1);
        assert!(!failed["payload"]["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_reports_render_failed() {
        let state = state("http://127.0.0.1:1/rackdiagram?");
        let mut rx = state.ws_hub.listen().await;

        let session = open_session(&state, true, Some(fa_config())).await;
        let id = session.id;
        on_builder_changed(state.clone(), session).await.unwrap();

        assert_eq!(next_event(&mut rx).await["type"], "builder_updated");
        let failed = next_event(&mut rx).await;
        assert_eq!(failed["type"], "render_failed");
        assert_eq!(failed["payload"]["builder_id"], id.to_string());
        assert_eq!(failed["payload"]["revision"], 1);
        assert!(failed["payload"].get("view").is_none());
    }
}
