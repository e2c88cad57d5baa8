pub mod client;
pub mod overlay;

pub use client::RenderClient;

use base64::Engine;

use crate::models::{DiagramUrls, Port, RenderView};

/// Image payload kinds the page knows how to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    /// Inline base64 PNG
    Png,
    /// URL of an uploaded image
    Link,
}

impl ImageType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "png" => Some(Self::Png),
            "link" => Some(Self::Link),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Link => "link",
        }
    }
}

/// Result of one render cycle
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// The API reported an error; the image is hidden and the message shown verbatim
    Failed { error: String },
    Rendered {
        image_type: ImageType,
        /// `src` for the page's image element
        image_src: String,
        bytes: Vec<u8>,
        ports: Vec<Port>,
    },
    /// Unknown `image_type`; nothing is displayed
    Unsupported { image_type: String },
}

/// Decode an inline PNG payload
pub fn decode_png_payload(payload: &str) -> anyhow::Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| anyhow::anyhow!("Invalid base64 image payload: {}", e))
}

/// Width and height from a PNG IHDR chunk
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if bytes.len() < 24 || !bytes.starts_with(SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// Turn a render outcome into the page view. Returns None for unsupported
/// image types. Without a displayed size the image is assumed to be shown
/// at its natural size.
pub fn render_view(
    urls: &DiagramUrls,
    outcome: &RenderOutcome,
    displayed: Option<(f64, f64)>,
) -> Option<RenderView> {
    let mut view = RenderView {
        url: urls.url.clone(),
        vssx_url: urls.vssx_url.clone(),
        error: None,
        image_type: None,
        image_src: None,
        natural_width: None,
        natural_height: None,
        hotspots: Vec::new(),
    };

    match outcome {
        RenderOutcome::Unsupported { .. } => return None,
        RenderOutcome::Failed { error } => {
            view.error = Some(error.clone());
        }
        RenderOutcome::Rendered {
            image_type,
            image_src,
            bytes,
            ports,
        } => {
            view.image_type = Some(image_type.as_str().to_string());
            view.image_src = Some(image_src.clone());
            if let Some((w, h)) = png_dimensions(bytes) {
                view.natural_width = Some(w);
                view.natural_height = Some(h);
                let displayed = displayed.unwrap_or((w as f64, h as f64));
                view.hotspots = overlay::hotspots(ports, (w, h), displayed);
            }
        }
    }

    Some(view)
}
