use serde::{Deserialize, Serialize};

/// Lowest and highest physical blade slot in a chassis
pub const FIRST_BLADE_SLOT: u32 = 1;
pub const LAST_BLADE_SLOT: u32 = 10;

/// A datapack placed into the chassis (shelf 0) or an expansion shelf.
/// Optional fields are left out of the encoding so the API picks defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapack {
    pub fm_size: String,
    pub fm_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_slot: Option<u32>,
}

/// Shelf entry of a datapacksv2 list. Index 0 is the chassis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub datapacks: Vec<Datapack>,
}

/// A group of identically populated blades starting at `first_slot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeConfig {
    pub bays: Vec<u32>,
    pub dfm_size: String,
    pub blade_count: u32,
    pub first_slot: u32,
    pub blade_model: String,
}

/// Chassis entry of a bladesv2 list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BladeChassis {
    pub gen: String,
    pub blades: Vec<BladeConfig>,
}

impl BladeChassis {
    pub fn new(gen: impl Into<String>) -> Self {
        Self {
            gen: gen.into(),
            blades: Vec::new(),
        }
    }
}

pub type ShelfList = Vec<Shelf>;
pub type ChassisList = Vec<BladeChassis>;

/// Source of the FlashArray datapack parameter: the legacy string input
/// or the shelf list built in advanced mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatapackSource {
    Legacy(String),
    Advanced(ShelfList),
}

impl Default for DatapackSource {
    fn default() -> Self {
        Self::Legacy(String::new())
    }
}

/// Source of the FlashBlade blades parameter (e.g. `17:0-14,52:15-129`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BladeSource {
    Legacy(String),
    Advanced(ChassisList),
}

impl Default for BladeSource {
    fn default() -> Self {
        Self::Legacy(String::new())
    }
}

/// FlashBlade//S blade population. The legacy form is a count plus a
/// uniform drive size and drives-per-blade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FbsBladeSource {
    Advanced(ChassisList),
    Legacy {
        #[serde(default)]
        blades: String,
        #[serde(default)]
        dfm_size: String,
        #[serde(default)]
        dfm_count: String,
    },
}

impl Default for FbsBladeSource {
    fn default() -> Self {
        Self::Legacy {
            blades: String::new(),
            dfm_size: String::new(),
            dfm_count: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datapack_optional_fields_skipped() {
        let dp = Datapack {
            fm_size: "11TB".to_string(),
            fm_count: 10,
            dp_label: None,
            fm_type: None,
            first_slot: None,
        };
        let json = serde_json::to_string(&dp).unwrap();
        assert_eq!(json, r#"{"fm_size":"11TB","fm_count":10}"#);
    }

    #[test]
    fn test_datapack_source_untagged() {
        let legacy: DatapackSource = serde_json::from_str(r#""91/91-45/45""#).unwrap();
        assert_eq!(legacy, DatapackSource::Legacy("91/91-45/45".to_string()));

        let advanced: DatapackSource =
            serde_json::from_str(r#"[{"datapacks":[]},{"datapacks":[{"fm_size":"11TB","fm_count":10}]}]"#)
                .unwrap();
        match advanced {
            DatapackSource::Advanced(shelves) => {
                assert_eq!(shelves.len(), 2);
                assert_eq!(shelves[1].datapacks[0].fm_count, 10);
            }
            other => panic!("expected advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_fbs_blade_source_shapes() {
        let legacy: FbsBladeSource =
            serde_json::from_str(r#"{"blades":"7","dfm_size":"24","dfm_count":"2"}"#).unwrap();
        assert!(matches!(legacy, FbsBladeSource::Legacy { ref blades, .. } if blades == "7"));

        let advanced: FbsBladeSource = serde_json::from_str(r#"[{"gen":"1","blades":[]}]"#).unwrap();
        assert_eq!(advanced, FbsBladeSource::Advanced(vec![BladeChassis::new("1")]));
    }
}
