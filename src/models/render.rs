use serde::{Deserialize, Serialize};

use crate::config::Environment;

use super::products::ProductConfig;

/// Body of the JSON response returned by the rendering API when `json=True`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiRenderResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub ports: Option<Vec<Port>>,
}

/// A port hot-spot reported by the API. `loc` is in natural image pixels;
/// every other attribute is kept as-is for the tooltip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub loc: [f64; 2],
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Overlay hot-spot in displayed-image coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub left: f64,
    pub top: f64,
    pub size: f64,
    pub tooltip: String,
}

/// Request body shared by the diagram endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramRequest {
    pub config: ProductConfig,
    #[serde(default)]
    pub builder_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub display_width: Option<f64>,
    #[serde(default)]
    pub display_height: Option<f64>,
}

/// URLs derived from one configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramUrls {
    pub url: String,
    pub vssx_url: String,
    pub json_url: String,
}

/// Everything the page needs to show a rendered diagram
#[derive(Debug, Clone, Serialize)]
pub struct RenderView {
    pub url: String,
    pub vssx_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<u32>,
    pub hotspots: Vec<Hotspot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_keeps_unknown_attributes() {
        let port: Port = serde_json::from_str(
            r#"{"loc":[120,40],"name":"ct0.eth2","services":["replication"],"custom":1}"#,
        )
        .unwrap();
        assert_eq!(port.loc, [120.0, 40.0]);
        assert_eq!(port.attributes["name"], "ct0.eth2");
        assert_eq!(port.attributes["custom"], 1);
        assert!(!port.attributes.contains_key("loc"));
    }

    #[test]
    fn test_error_response_parses() {
        let resp: ApiRenderResponse =
            serde_json::from_str(r#"{"error":"invalid model","image_type":null}"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some("invalid model"));
        assert!(resp.image.is_none());
        assert!(resp.image_type.is_none());
    }
}
