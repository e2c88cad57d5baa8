use serde::{Deserialize, Serialize};

use super::advanced::{BladeSource, DatapackSource, FbsBladeSource};

/// FlashArray form state. Blank strings mean "not selected".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaConfig {
    pub model: String,
    pub protocol: String,
    pub face: String,
    pub datapacks: DatapackSource,
    pub csize: String,
    pub bezel: String,
    pub direction: String,
    pub fm_label: String,
    pub dp_label: String,
    pub ports: String,
    pub mezz: String,
    pub dc_power: String,
    pub addoncards: Vec<String>,
    /// Index is the PCI slot number
    pub pci: Vec<String>,
    pub chassis_gen: String,
    pub individual: bool,
}

/// FlashBlade (classic) form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbConfig {
    pub chassis: String,
    pub face: String,
    pub direction: String,
    pub xfm: String,
    pub blades: BladeSource,
    pub efm: String,
    pub xfm_face: String,
    pub xfm_model: String,
    pub ports: String,
    pub individual: bool,
}

/// FlashBlade//S form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbsConfig {
    pub model: String,
    pub face: String,
    pub direction: String,
    pub xfm: String,
    pub chassis: String,
    pub blades: FbsBladeSource,
    pub xfm_face: String,
    pub xfm_model: String,
    pub bezel: String,
    pub ports: String,
    pub individual: bool,
}

/// Product family tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Fa,
    Fb,
    Fbs,
}

/// The configuration of whichever tab is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ProductConfig {
    Fa(FaConfig),
    Fb(FbConfig),
    Fbs(FbsConfig),
}

impl ProductConfig {
    pub fn family(&self) -> Family {
        match self {
            Self::Fa(_) => Family::Fa,
            Self::Fb(_) => Family::Fb,
            Self::Fbs(_) => Family::Fbs,
        }
    }

    /// Model string used by the visibility rules. FB classic has a fixed model.
    pub fn model(&self) -> &str {
        match self {
            Self::Fa(c) => &c.model,
            Self::Fb(_) => "fb",
            Self::Fbs(c) => &c.model,
        }
    }

    pub fn face(&self) -> &str {
        match self {
            Self::Fa(c) => &c.face,
            Self::Fb(c) => &c.face,
            Self::Fbs(c) => &c.face,
        }
    }
}
