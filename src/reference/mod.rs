//! Read-only datapack reference tables loaded from YAML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in copy of the reference tables, used when no path is configured
const BUILTIN_REFERENCE: &str = include_str!("../../data/reference.yaml");

/// Flash module family of a datapack size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleCategory {
    Nvme,
    Scm,
    NvmeQlc,
    Sas,
    Blank,
}

/// One datapack size entry. Stored on disk as
/// `[module_size, category, module_count, dp_label]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, ModuleCategory, u32, String)")]
pub struct DatapackSize {
    pub module_size: String,
    pub category: ModuleCategory,
    pub module_count: u32,
    pub dp_label: String,
}

impl From<(String, ModuleCategory, u32, String)> for DatapackSize {
    fn from((module_size, category, module_count, dp_label): (String, ModuleCategory, u32, String)) -> Self {
        Self {
            module_size,
            category,
            module_count,
            dp_label,
        }
    }
}

/// All reference tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub chassis_dp_size_lookup: BTreeMap<String, DatapackSize>,
    #[serde(default)]
    pub shelf_dp_size_lookup: BTreeMap<String, DatapackSize>,
    /// csize -> legacy datapacks string
    #[serde(default)]
    pub csize_lookup: BTreeMap<String, String>,
}

impl ReferenceData {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse reference data")
    }

    /// Load from `path`, or the built-in tables when `path` is empty
    pub fn load(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Self::from_yaml(BUILTIN_REFERENCE);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data {}", path))?;
        Self::from_yaml(&text)
    }

    /// csize choices in numeric order
    pub fn csizes(&self) -> Vec<String> {
        let mut sizes: Vec<String> = self.csize_lookup.keys().cloned().collect();
        sizes.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            _ => a.cmp(b),
        });
        sizes
    }

    /// Look up a size id in the chassis table (shelf 0) or the shelf table
    pub fn datapack_size(&self, shelf_index: usize, size_id: &str) -> Option<&DatapackSize> {
        if shelf_index == 0 {
            self.chassis_dp_size_lookup.get(size_id)
        } else {
            self.shelf_dp_size_lookup.get(size_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_reference_loads() {
        let data = ReferenceData::load("").unwrap();
        assert!(!data.chassis_dp_size_lookup.is_empty());
        assert!(!data.shelf_dp_size_lookup.is_empty());

        let blank = data.datapack_size(0, "0").unwrap();
        assert_eq!(blank.category, ModuleCategory::Blank);
    }

    #[test]
    fn test_entry_tuple_format() {
        let yaml = r#"
chassis_dp_size_lookup:
  "366": ["36.6TB", "nvme", 10, "366TB"]
shelf_dp_size_lookup:
  "18": ["18TB", "nvme-qlc", 10, "180TB"]
"#;
        let data = ReferenceData::from_yaml(yaml).unwrap();
        assert_eq!(
            data.datapack_size(0, "366"),
            Some(&DatapackSize {
                module_size: "36.6TB".to_string(),
                category: ModuleCategory::Nvme,
                module_count: 10,
                dp_label: "366TB".to_string(),
            })
        );
        assert_eq!(data.datapack_size(1, "18").unwrap().category, ModuleCategory::NvmeQlc);
        assert!(data.datapack_size(1, "366").is_none());
        assert!(data.csize_lookup.is_empty());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let yaml = r#"
chassis_dp_size_lookup:
  "1": ["1TB", "tape", 10, "10TB"]
"#;
        assert!(ReferenceData::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_csizes_numeric_order() {
        let mut data = ReferenceData::default();
        for size in ["878", "247", "1000"] {
            data.csize_lookup.insert(size.to_string(), String::new());
        }
        assert_eq!(data.csizes(), vec!["247", "878", "1000"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(ReferenceData::load("/nonexistent/reference.yaml").is_err());
    }
}
