pub mod advanced;
pub mod options;
pub mod products;
pub mod render;

pub use advanced::*;
pub use options::{option_tables, OptionTables, CSIZE_PLACEHOLDER, PCI_SLOT_COUNT};
pub use products::*;
pub use render::*;

use serde::{Deserialize, Serialize};

/// Canonical face values
pub mod face {
    pub const BACK: &str = "back";
}

/// Which advanced structure a builder session edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderKind {
    /// datapacksv2: shelves of datapacks (FlashArray)
    Datapacks,
    /// bladesv2: chassis of blade configs (FlashBlade / FlashBlade//S)
    Blades,
}

impl BuilderKind {
    /// Query parameter the encoded structure is sent under
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::Datapacks => "datapacksv2",
            Self::Blades => "bladesv2",
        }
    }
}

/// CreateBuilderRequest starts an advanced builder session
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBuilderRequest {
    pub kind: BuilderKind,
    #[serde(default)]
    pub auto_update: bool,
    /// Existing datapacksv2/bladesv2 value to start from
    #[serde(default)]
    pub encoded: Option<String>,
}

/// UpdateBuilderSettingsRequest toggles auto-update and attaches the form
/// state used when auto-update re-renders
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBuilderSettingsRequest {
    #[serde(default)]
    pub auto_update: Option<bool>,
    #[serde(default)]
    pub config: Option<ProductConfig>,
    #[serde(default)]
    pub environment: Option<crate::config::Environment>,
}

/// AddContainerRequest appends a shelf or chassis
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddContainerRequest {
    #[serde(default)]
    pub gen: Option<String>,
}

/// Raw datapack form input. Empty strings are treated as not supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatapackInput {
    #[serde(default)]
    pub fm_size: String,
    #[serde(default)]
    pub fm_count: u32,
    #[serde(default)]
    pub dp_label: String,
    #[serde(default)]
    pub fm_type: String,
    #[serde(default)]
    pub first_slot: Option<u32>,
}

/// Raw blade-config form input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BladeConfigInput {
    #[serde(default)]
    pub bays: Vec<u32>,
    #[serde(default)]
    pub dfm_size: String,
    #[serde(default)]
    pub blade_count: u32,
    #[serde(default)]
    pub first_slot: u32,
    #[serde(default)]
    pub blade_model: String,
}

/// VisibilityRequest asks which fields a tab shows for a model/face pair
#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub family: Family,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub face: String,
}
