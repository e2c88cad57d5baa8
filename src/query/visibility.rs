use std::collections::BTreeSet;

use crate::models::{face, Family, PCI_SLOT_COUNT};

const PCI_FIELDS: [&str; PCI_SLOT_COUNT] = [
    "pci0", "pci1", "pci2", "pci3", "pci4", "pci5", "pci6", "pci7", "pci8",
];

/// Parsed FlashArray model name, e.g. `fa-x70r4b` or `fa-xl170`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaModel {
    pub generation: String,
    pub model_num: Option<u32>,
    pub release: Option<u32>,
}

/// Split a FlashArray model string into generation, number and release.
/// Returns None for strings that are not FlashArray models.
pub fn parse_fa_model(model: &str) -> Option<FaModel> {
    let re = regex_lite::Regex::new(r"^fa-(xl|[a-z])(\d+)?(?:r(\d+))?[a-z]?$").ok()?;
    let lower = model.trim().to_lowercase();
    let caps = re.captures(&lower)?;
    Some(FaModel {
        generation: caps.get(1)?.as_str().to_string(),
        model_num: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        release: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Number of PCI slots the back-face form exposes for a FlashArray model
pub fn fa_pci_slots(model: &str) -> usize {
    match parse_fa_model(model) {
        Some(m) if m.generation == "xl" => PCI_SLOT_COUNT,
        Some(m) if m.release.map_or(false, |r| r >= 4) => 6,
        _ => 4,
    }
}

/// Capacity (`//C`) models select a csize and have no mezzanine
fn is_capacity_model(model: &str) -> bool {
    model.to_lowercase().contains("-c")
}

/// Field ids a tab shows for the given model and face
pub fn visible_fields(family: Family, model: &str, face_value: &str) -> BTreeSet<&'static str> {
    let back = face_value == face::BACK;
    let mut fields: BTreeSet<&'static str> = BTreeSet::new();

    match family {
        Family::Fa => {
            fields.extend(["model", "face", "datapacks", "direction", "chassis_gen", "individual"]);
            let capacity = is_capacity_model(model);
            if capacity {
                fields.insert("csize");
            }
            if back {
                fields.extend(["protocol", "addoncards", "dc_power"]);
                if !capacity {
                    fields.extend(["mezz", "ports"]);
                }
                fields.extend(PCI_FIELDS.iter().take(fa_pci_slots(model)).copied());
            } else {
                fields.extend(["fm_label", "dp_label", "bezel"]);
            }
        }
        Family::Fb => {
            fields.extend([
                "model", "chassis", "face", "direction", "xfm", "blades", "efm",
                "xfm_face", "xfm_model", "individual",
            ]);
            if back {
                fields.insert("ports");
            }
        }
        Family::Fbs => {
            fields.extend([
                "model", "face", "direction", "xfm", "chassis", "blades", "dfm_size",
                "dfm_count", "xfm_face", "xfm_model", "individual",
            ]);
            if back {
                fields.insert("ports");
            } else {
                fields.insert("bezel");
            }
        }
    }

    fields
}
