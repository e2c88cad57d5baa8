//! Static option tables used to populate the selects of each product tab.

use serde::Serialize;

/// Placeholder first entry of the csize select; means "no explicit override"
pub const CSIZE_PLACEHOLDER: &str = "Current Sizes:";

/// Number of addressable PCI slots on the largest FlashArray chassis
pub const PCI_SLOT_COUNT: usize = 9;

#[derive(Debug, Clone, Serialize)]
pub struct FaOptions {
    pub model: Vec<&'static str>,
    pub protocol: Vec<&'static str>,
    pub face: Vec<&'static str>,
    pub datapacks: &'static str,
    pub csizes: Vec<String>,
    pub bezel: Vec<&'static str>,
    pub direction: Vec<&'static str>,
    pub fm_label: Vec<&'static str>,
    pub dp_label: Vec<&'static str>,
    pub addoncards: Vec<&'static str>,
    pub ports: Vec<&'static str>,
    pub mezz: Vec<&'static str>,
    pub dc_power: Vec<&'static str>,
    pub pci_cards: Vec<&'static str>,
    pub chassis_gen: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FbOptions {
    pub face: Vec<&'static str>,
    pub chassis: Vec<&'static str>,
    pub xfm: Vec<&'static str>,
    pub direction: Vec<&'static str>,
    pub blades: &'static str,
    pub efm: Vec<&'static str>,
    pub xfm_face: Vec<&'static str>,
    pub xfm_model: Vec<&'static str>,
    pub ports: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FbsOptions {
    pub model: Vec<&'static str>,
    pub face: Vec<&'static str>,
    pub direction: Vec<&'static str>,
    pub xfm: Vec<&'static str>,
    pub chassis: Vec<&'static str>,
    pub blades: &'static str,
    pub dfm_size: Vec<&'static str>,
    pub dfm_count: Vec<&'static str>,
    pub blade_bays: Vec<u32>,
    pub chassis_gen: Vec<&'static str>,
    pub xfm_face: Vec<&'static str>,
    pub xfm_model: Vec<&'static str>,
    pub bezel: Vec<&'static str>,
    pub ports: Vec<&'static str>,
}

/// All option tables, keyed by tab
#[derive(Debug, Clone, Serialize)]
pub struct OptionTables {
    pub fa: FaOptions,
    pub fb: FbOptions,
    pub fbs: FbsOptions,
}

const FACES: &[&str] = &["front", "back"];
const DIRECTIONS: &[&str] = &["up", "down"];
const BOOL_SELECT: &[&str] = &["", "FALSE", "TRUE"];

/// Build the option tables. `csizes` comes from the reference data and is
/// listed after the placeholder entry.
pub fn option_tables(csizes: &[String]) -> OptionTables {
    let mut csize_list = vec![CSIZE_PLACEHOLDER.to_string()];
    csize_list.extend(csizes.iter().cloned());

    OptionTables {
        fa: FaOptions {
            model: vec![
                "fa-x20r4", "fa-x50r4", "fa-x70r4", "fa-x90r4",
                "fa-x70r4b", "fa-x90r4b",
                "fa-c50r4", "fa-c60r4", "fa-c70r4", "fa-c90r4",
                "fa-c50r4b", "fa-c70r4b", "fa-c90r4b",
                "fa-xl130", "fa-xl170",
                "fa-er1b", "fa-e",
                "fa-x10r3", "fa-x20r3", "fa-x50r3", "fa-x70r3", "fa-x90r3",
                "fa-c40r3", "fa-c60r3",
                "fa-m10r2", "fa-m20r2", "fa-m50r2", "fa-m70r2",
                "fa-x10r2", "fa-x20r2", "fa-x50r2", "fa-x70r2", "fa-x90r2",
                "fa-x70r1",
            ],
            protocol: vec!["fc", "eth"],
            face: FACES.to_vec(),
            datapacks: "91/91-45/45",
            csizes: csize_list,
            bezel: vec!["", "FALSE", "TRUE"],
            direction: DIRECTIONS.to_vec(),
            fm_label: BOOL_SELECT.to_vec(),
            dp_label: BOOL_SELECT.to_vec(),
            addoncards: vec![
                "4fc", "2fc", "2eth", "2eth25", "2eth40", "2eth100", "2ethbaset",
                "4eth25", "sas", "2nvme-fc", "blank",
            ],
            ports: BOOL_SELECT.to_vec(),
            mezz: vec!["", "smezz", "emezz"],
            dc_power: vec!["", "FALSE", "TRUE"],
            pci_cards: vec![
                "", "4fc", "2fc", "2eth", "2eth25", "2eth40", "2eth100", "2ethbaset",
                "4eth25", "sas", "2nvme-fc", "blank",
            ],
            chassis_gen: vec!["", "1", "2"],
        },
        fb: FbOptions {
            face: FACES.to_vec(),
            chassis: vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"],
            xfm: BOOL_SELECT.to_vec(),
            direction: DIRECTIONS.to_vec(),
            blades: "17:0-14,52:15-129",
            efm: vec!["", "efm110", "efm310"],
            xfm_face: vec!["", "front", "back"],
            xfm_model: vec!["", "8400", "3200e"],
            ports: BOOL_SELECT.to_vec(),
        },
        fbs: FbsOptions {
            model: vec!["fb-s100", "fb-s200", "fb-s500", "fb-s200r2", "fb-s500r2", "fb-e"],
            face: FACES.to_vec(),
            direction: vec!["", "up", "down"],
            xfm: BOOL_SELECT.to_vec(),
            chassis: vec!["", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"],
            blades: "7",
            dfm_size: vec!["24", "37.5", "48", "75", "150"],
            dfm_count: vec!["1", "2", "3", "4"],
            blade_bays: vec![1, 2, 3, 4],
            chassis_gen: vec!["1", "2"],
            xfm_face: vec!["", "front", "back", "bezel"],
            xfm_model: vec!["", "8400", "3200e"],
            bezel: BOOL_SELECT.to_vec(),
            ports: BOOL_SELECT.to_vec(),
        },
    }
}
