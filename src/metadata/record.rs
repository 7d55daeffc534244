use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name of the descriptor written into every model folder.
pub const METADATA_FILE: &str = "metadata.yaml";

pub const DEFAULT_RPATH: &str = "regressor";
pub const DEFAULT_WPATH: &str = "weights.csv";
pub const DEFAULT_IPATH: &str = "weights_inv.csv";
pub const DEFAULT_VERSION: f64 = 1.0;

/// The descriptor a model loader reads to locate the regressor, its weights
/// and the mechanism file. All paths are relative to the model folder.
///
/// YAML shape:
/// ```yaml
/// name: PCDNNV2
/// rpath: regressor
/// wpath: weights.csv
/// mechanism: GRIMech30.yaml
/// version: 2.0
/// initializers: { ... }   # initial-condition mode only
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_rpath")]
    pub rpath: String,

    #[serde(default = "default_wpath")]
    pub wpath: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipath: Option<String>,

    #[serde(default)]
    pub mechanism: String,

    #[serde(default = "default_version")]
    pub version: f64,

    /// `Some(Value::Null)` for an explicit `initializers: ~`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub initializers: Option<Value>,

    /// Any other top-level keys (only templates carry these).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_rpath() -> String {
    DEFAULT_RPATH.to_string()
}

fn default_wpath() -> String {
    DEFAULT_WPATH.to_string()
}

fn default_version() -> f64 {
    DEFAULT_VERSION
}

/// A key that is present maps to `Some`, even when its value is null.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            rpath: default_rpath(),
            wpath: default_wpath(),
            ipath: None,
            mechanism: String::new(),
            version: DEFAULT_VERSION,
            initializers: None,
            extra: BTreeMap::new(),
        }
    }
}

impl MetadataRecord {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Read a record from a YAML file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read metadata file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parse metadata file {}", path.display()))
    }

    /// Write the record to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).with_context(|| format!("write metadata file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> MetadataRecord {
        MetadataRecord {
            name: "PCDNNV2".to_string(),
            mechanism: "GRIMech30.yaml".to_string(),
            version: 2.0,
            initializers: Some(serde_yaml::from_str("{a: 1, b: 2}").unwrap()),
            ..MetadataRecord::default()
        }
    }

    #[test]
    fn yaml_round_trip_preserves_record() {
        let rec = sample();
        let back = MetadataRecord::from_yaml(&rec.to_yaml().unwrap()).unwrap();
        assert_eq!(rec, back);
    }

    #[test]
    fn file_round_trip_preserves_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(METADATA_FILE);
        let rec = sample();
        rec.write(&path).unwrap();
        assert_eq!(rec, MetadataRecord::read(&path).unwrap());
    }

    #[test]
    fn null_initializers_round_trip() {
        let rec = MetadataRecord {
            initializers: Some(Value::Null),
            ..sample()
        };
        let yaml = rec.to_yaml().unwrap();
        assert!(yaml.contains("initializers: null"), "{}", yaml);
        assert_eq!(MetadataRecord::from_yaml(&yaml).unwrap(), rec);
    }

    #[test]
    fn absent_initializers_stay_absent() {
        let rec = MetadataRecord::from_yaml("name: x\nmechanism: m.yaml\n").unwrap();
        assert_eq!(rec.initializers, None);
    }

    #[test]
    fn optional_fields_are_omitted() {
        let rec = MetadataRecord {
            name: "m".to_string(),
            mechanism: "mech.yaml".to_string(),
            ..MetadataRecord::default()
        };
        let yaml = rec.to_yaml().unwrap();
        assert!(!yaml.contains("ipath"));
        assert!(!yaml.contains("initializers"));
        assert!(yaml.contains("rpath: regressor"));
        assert!(yaml.contains("wpath: weights.csv"));
    }

    #[test]
    fn version_keeps_fractional_value() {
        let rec = MetadataRecord {
            version: 3.5,
            ..MetadataRecord::default()
        };
        let yaml = rec.to_yaml().unwrap();
        assert!(yaml.contains("version: 3.5"), "{}", yaml);
    }

    #[test]
    fn unknown_keys_survive_in_extra() {
        let rec = MetadataRecord::from_yaml(
            "name: x\nmechanism: m.yaml\nversion: 1\nauthor: someone\n",
        )
        .unwrap();
        assert_eq!(rec.version, 1.0);
        assert_eq!(
            rec.extra.get("author"),
            Some(&Value::String("someone".to_string()))
        );
        assert_eq!(rec.rpath, DEFAULT_RPATH);
    }
}
