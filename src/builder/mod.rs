//! Advanced-builder editor for the datapacksv2 and bladesv2 structures.

pub mod store;

use serde::Serialize;

use crate::jsonurl;
use crate::models::*;

pub use store::{BuilderSession, BuilderStore};

/// Default generation for chassis added without one
pub const DEFAULT_CHASSIS_GEN: &str = "1";

/// Upper bound on shelves (chassis plus expansion shelves) or blade chassis
pub const MAX_CONTAINERS: usize = 16;

/// Rejected editor operation. The structure is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    Invalid(String),
    NoSuchContainer(usize),
    NoSuchItem { container: usize, item: usize },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "{}", msg),
            Self::NoSuchContainer(index) => write!(f, "container {} does not exist", index),
            Self::NoSuchItem { container, item } => {
                write!(f, "item {} does not exist in container {}", item, container)
            }
        }
    }
}

impl std::error::Error for EditorError {}

/// The structure a builder session edits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdvancedStructure {
    Shelves(ShelfList),
    Chassis(ChassisList),
}

impl AdvancedStructure {
    /// A fresh structure holds only container 0
    pub fn new(kind: BuilderKind) -> Self {
        match kind {
            BuilderKind::Datapacks => Self::Shelves(vec![Shelf::default()]),
            BuilderKind::Blades => Self::Chassis(vec![BladeChassis::new(DEFAULT_CHASSIS_GEN)]),
        }
    }

    pub fn kind(&self) -> BuilderKind {
        match self {
            Self::Shelves(_) => BuilderKind::Datapacks,
            Self::Chassis(_) => BuilderKind::Blades,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Shelves(s) => s.len(),
            Self::Chassis(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encoded query parameter value
    pub fn encode(&self) -> anyhow::Result<String> {
        match self {
            Self::Shelves(s) => jsonurl::to_string(s),
            Self::Chassis(c) => jsonurl::to_string(c),
        }
    }

    /// Parse an encoded datapacksv2/bladesv2 value, such as one copied out of
    /// a diagram URL. Every item must pass the same checks as an interactive
    /// add. An empty list yields a fresh structure.
    pub fn decode(kind: BuilderKind, text: &str) -> Result<Self, EditorError> {
        let invalid = |e: anyhow::Error| {
            EditorError::Invalid(format!("invalid {} value: {}", kind.param_name(), e))
        };
        let structure = match kind {
            BuilderKind::Datapacks => {
                let shelves: ShelfList = jsonurl::from_str(text).map_err(invalid)?;
                for dp in shelves.iter().flat_map(|s| &s.datapacks) {
                    validate_datapack(&datapack_input(dp))?;
                }
                Self::Shelves(shelves)
            }
            BuilderKind::Blades => {
                let chassis: ChassisList = jsonurl::from_str(text).map_err(invalid)?;
                for blade in chassis.iter().flat_map(|c| &c.blades) {
                    validate_blade_config(&blade_config_input(blade))?;
                }
                Self::Chassis(chassis)
            }
        };
        if structure.len() > MAX_CONTAINERS {
            return Err(EditorError::Invalid(format!(
                "at most {} containers are supported",
                MAX_CONTAINERS
            )));
        }
        if structure.is_empty() {
            return Ok(Self::new(kind));
        }
        Ok(structure)
    }

    /// Switch the matching source of `config` to this structure. Shelves go
    /// to FlashArray datapacks, chassis to FlashBlade or FlashBlade//S blades.
    pub fn attach_to(&self, config: &mut ProductConfig) -> Result<(), EditorError> {
        match (self, config) {
            (Self::Shelves(shelves), ProductConfig::Fa(fa)) => {
                fa.datapacks = DatapackSource::Advanced(shelves.clone());
            }
            (Self::Chassis(chassis), ProductConfig::Fb(fb)) => {
                fb.blades = BladeSource::Advanced(chassis.clone());
            }
            (Self::Chassis(chassis), ProductConfig::Fbs(fbs)) => {
                fbs.blades = FbsBladeSource::Advanced(chassis.clone());
            }
            (structure, config) => {
                return Err(EditorError::Invalid(format!(
                    "{} builder cannot be used for {:?} diagrams",
                    structure.kind().param_name(),
                    config.family()
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one editor call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Unchanged,
}

/// Editor state: the structure plus the currently targeted container
#[derive(Debug, Clone)]
pub struct Editor {
    structure: AdvancedStructure,
    target: usize,
}

impl Editor {
    pub fn new(kind: BuilderKind) -> Self {
        Self::with_structure(AdvancedStructure::new(kind))
    }

    pub fn with_structure(structure: AdvancedStructure) -> Self {
        Self {
            structure,
            target: 0,
        }
    }

    pub fn structure(&self) -> &AdvancedStructure {
        &self.structure
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Append an empty shelf/chassis at the end and target it
    pub fn add_container(&mut self, gen: Option<&str>) -> Result<Mutation, EditorError> {
        check_index(self.structure.len())?;
        match &mut self.structure {
            AdvancedStructure::Shelves(shelves) => shelves.push(Shelf::default()),
            AdvancedStructure::Chassis(chassis) => {
                let gen = gen.filter(|g| !g.trim().is_empty()).unwrap_or(DEFAULT_CHASSIS_GEN);
                chassis.push(BladeChassis::new(gen));
            }
        }
        self.target = self.structure.len() - 1;
        Ok(Mutation::Applied)
    }

    /// Validate and append a datapack to `shelf_index`, creating shelves up to it
    pub fn add_datapack(&mut self, shelf_index: usize, input: &DatapackInput) -> Result<Mutation, EditorError> {
        check_index(shelf_index)?;
        let datapack = validate_datapack(input)?;
        let AdvancedStructure::Shelves(shelves) = &mut self.structure else {
            return Err(EditorError::Invalid("this builder edits blades, not datapacks".to_string()));
        };
        while shelves.len() <= shelf_index {
            shelves.push(Shelf::default());
        }
        shelves[shelf_index].datapacks.push(datapack);
        Ok(Mutation::Applied)
    }

    /// Validate and append a blade config to `chassis_index`, creating chassis up to it
    pub fn add_blade_config(&mut self, chassis_index: usize, input: &BladeConfigInput) -> Result<Mutation, EditorError> {
        check_index(chassis_index)?;
        let blade = validate_blade_config(input)?;
        let AdvancedStructure::Chassis(chassis) = &mut self.structure else {
            return Err(EditorError::Invalid("this builder edits datapacks, not blades".to_string()));
        };
        while chassis.len() <= chassis_index {
            chassis.push(BladeChassis::new(DEFAULT_CHASSIS_GEN));
        }
        chassis[chassis_index].blades.push(blade);
        Ok(Mutation::Applied)
    }

    /// Remove exactly one item; the others keep their order
    pub fn remove_item(&mut self, container: usize, item: usize) -> Result<Mutation, EditorError> {
        let missing = EditorError::NoSuchItem { container, item };
        match &mut self.structure {
            AdvancedStructure::Shelves(shelves) => {
                let shelf = shelves.get_mut(container).ok_or(missing.clone())?;
                if item >= shelf.datapacks.len() {
                    return Err(missing);
                }
                shelf.datapacks.remove(item);
            }
            AdvancedStructure::Chassis(chassis) => {
                let entry = chassis.get_mut(container).ok_or(missing.clone())?;
                if item >= entry.blades.len() {
                    return Err(missing);
                }
                entry.blades.remove(item);
            }
        }
        Ok(Mutation::Applied)
    }

    /// Remove a shelf/chassis and its contents. Container 0 is never removed.
    pub fn remove_container(&mut self, index: usize) -> Result<Mutation, EditorError> {
        if index == 0 {
            return Ok(Mutation::Unchanged);
        }
        if index >= self.structure.len() {
            return Err(EditorError::NoSuchContainer(index));
        }
        match &mut self.structure {
            AdvancedStructure::Shelves(shelves) => {
                shelves.remove(index);
            }
            AdvancedStructure::Chassis(chassis) => {
                chassis.remove(index);
            }
        }
        self.target = self.structure.len().saturating_sub(1);
        Ok(Mutation::Applied)
    }
}

fn check_index(index: usize) -> Result<(), EditorError> {
    if index >= MAX_CONTAINERS {
        return Err(EditorError::Invalid(format!(
            "at most {} containers are supported",
            MAX_CONTAINERS
        )));
    }
    Ok(())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_datapack(input: &DatapackInput) -> Result<Datapack, EditorError> {
    let fm_size = non_blank(&input.fm_size)
        .ok_or_else(|| EditorError::Invalid("Please select a flash module size".to_string()))?;
    if input.fm_count == 0 {
        return Err(EditorError::Invalid(
            "Please enter a flash module count greater than 0".to_string(),
        ));
    }
    Ok(Datapack {
        fm_size,
        fm_count: input.fm_count,
        dp_label: non_blank(&input.dp_label),
        fm_type: non_blank(&input.fm_type),
        first_slot: input.first_slot,
    })
}

fn datapack_input(dp: &Datapack) -> DatapackInput {
    DatapackInput {
        fm_size: dp.fm_size.clone(),
        fm_count: dp.fm_count,
        dp_label: dp.dp_label.clone().unwrap_or_default(),
        fm_type: dp.fm_type.clone().unwrap_or_default(),
        first_slot: dp.first_slot,
    }
}

fn blade_config_input(blade: &BladeConfig) -> BladeConfigInput {
    BladeConfigInput {
        bays: blade.bays.clone(),
        dfm_size: blade.dfm_size.clone(),
        blade_count: blade.blade_count,
        first_slot: blade.first_slot,
        blade_model: blade.blade_model.clone(),
    }
}

fn validate_blade_config(input: &BladeConfigInput) -> Result<BladeConfig, EditorError> {
    if input.bays.is_empty() {
        return Err(EditorError::Invalid("Please select at least one bay".to_string()));
    }
    let dfm_size = non_blank(&input.dfm_size)
        .ok_or_else(|| EditorError::Invalid("Please select a DFM size".to_string()))?;
    if input.blade_count < 1 {
        return Err(EditorError::Invalid("Blade count must be at least 1".to_string()));
    }
    if !(FIRST_BLADE_SLOT..=LAST_BLADE_SLOT).contains(&input.first_slot) {
        return Err(EditorError::Invalid(format!(
            "First slot must be between {} and {}",
            FIRST_BLADE_SLOT, LAST_BLADE_SLOT
        )));
    }
    Ok(BladeConfig {
        bays: input.bays.clone(),
        dfm_size,
        blade_count: input.blade_count,
        first_slot: input.first_slot,
        blade_model: input.blade_model.trim().to_string(),
    })
}
