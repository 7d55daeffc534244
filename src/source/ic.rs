//! Initial-condition configuration: a YAML file describing simulation
//! initializers that also names the mechanism file it depends on.
//!
//! Only two keys matter here:
//! ```yaml
//! mechanism: GRIMech30.yaml   # relative to this file's directory
//! initializers:
//!   ...
//! ```

use crate::Result;
use anyhow::{Context, anyhow, bail};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditionConfig {
    /// Mechanism file, resolved against the config file's directory.
    pub mechanism: PathBuf,

    /// Copied verbatim into the metadata record.
    pub initializers: Value,
}

impl InitialConditionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| {
            format!("read initial-condition config {}", path.display())
        })?;
        Self::from_yaml(&text, path)
    }

    /// Parse and validate config text that was read from `path`.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(text)
            .with_context(|| format!("parse initial-condition config {}", path.display()))?;

        let map: &Mapping = doc.as_mapping().ok_or_else(|| {
            anyhow!(
                "{} is not a valid initial-condition config: expected a YAML mapping",
                path.display()
            )
        })?;

        let Some(initializers) = map.get("initializers") else {
            bail!(
                "{} is not a valid initial-condition config: missing `initializers`",
                path.display()
            );
        };

        let mechanism = match map.get("mechanism") {
            Some(Value::String(name)) => name,
            Some(_) => bail!(
                "{} is not a valid initial-condition config: `mechanism` must be a string",
                path.display()
            ),
            None => bail!(
                "{} is not a valid initial-condition config: missing `mechanism`",
                path.display()
            ),
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));

        Ok(Self {
            mechanism: base.join(mechanism),
            initializers: initializers.clone(),
        })
    }
}
