use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

use crate::models::ApiRenderResponse;

use super::{decode_png_payload, ImageType, RenderOutcome};

/// Rendering API client
#[derive(Clone)]
pub struct RenderClient {
    client: Client,
}

impl RenderClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }

    /// Fetch diagram metadata from a `json=True` URL. Error bodies that
    /// still carry the JSON shape are returned as-is so the message reaches
    /// the page.
    pub async fn fetch_metadata(&self, json_url: &str) -> Result<ApiRenderResponse> {
        let resp = self
            .client
            .get(json_url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<ApiRenderResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                Err(anyhow::anyhow!("Render API error {}: {}", status, body))
            }
            Err(e) => Err(anyhow::anyhow!("Invalid render API response: {}", e)),
        }
    }

    /// Fetch raw bytes, e.g. the image behind a `link` payload
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(anyhow::anyhow!("Image fetch error {} for {}", status, url));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// Run the render cycle for one metadata URL: fetch the metadata, then
    /// resolve the image bytes.
    pub async fn render(&self, json_url: &str) -> Result<RenderOutcome> {
        let response = self.fetch_metadata(json_url).await?;
        self.resolve(response).await
    }

    async fn resolve(&self, response: ApiRenderResponse) -> Result<RenderOutcome> {
        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            tracing::info!("Render API returned error: {}", error);
            return Ok(RenderOutcome::Failed { error });
        }

        let raw_type = response.image_type.unwrap_or_default();
        let Some(image_type) = ImageType::parse(&raw_type) else {
            tracing::warn!("Ignoring render response with image_type {:?}", raw_type);
            return Ok(RenderOutcome::Unsupported { image_type: raw_type });
        };

        let payload = response
            .image
            .ok_or_else(|| anyhow::anyhow!("Render API response has no image"))?;
        let ports = response.ports.unwrap_or_default();

        let (image_src, bytes) = match image_type {
            ImageType::Png => {
                let bytes = decode_png_payload(&payload)?;
                (format!("data:image/png;base64,{}", payload.trim()), bytes)
            }
            ImageType::Link => {
                let bytes = self.fetch_bytes(&payload).await?;
                (payload, bytes)
            }
        };

        tracing::debug!(
            "Rendered {} image ({} bytes, {} ports)",
            image_type.as_str(),
            bytes.len(),
            ports.len()
        );

        Ok(RenderOutcome::Rendered {
            image_type,
            image_src,
            bytes,
            ports,
        })
    }
}
