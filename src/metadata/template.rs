//! Metadata templates: a partially filled `metadata.yaml` whose `name` and
//! `mechanism` get replaced for each model folder.
//!
//! Example template:
//! ```yaml
//! # all paths are assumed to be relative
//! name: PCDNNV2_decomp-Wax-Orthog+Zmix
//! rpath: regressor
//! wpath: weights.csv
//! ipath: weights_inv.csv
//! mechanism: GRIMech30.yaml
//! version: 1.0
//! ```

use crate::Result;
use crate::metadata::record::{DEFAULT_IPATH, MetadataRecord};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Looked up in the working directory when no template is given.
pub const DEFAULT_TEMPLATE_FILE: &str = "template_metadata.yaml";

/// Load an explicit template file.
pub fn load_template(path: &Path) -> Result<MetadataRecord> {
    debug!(template = %path.display(), "loading metadata template");
    MetadataRecord::read(path).with_context(|| format!("load metadata template {}", path.display()))
}

/// Load `template_metadata.yaml` from `dir`, or fall back to the built-in
/// template when that file does not exist.
pub fn load_default_template_in(dir: &Path) -> Result<MetadataRecord> {
    let path = dir.join(DEFAULT_TEMPLATE_FILE);
    if path.exists() {
        load_template(&path)
    } else {
        debug!("no {} found, using built-in template", DEFAULT_TEMPLATE_FILE);
        Ok(builtin_template())
    }
}

pub fn builtin_template() -> MetadataRecord {
    MetadataRecord {
        ipath: Some(DEFAULT_IPATH.to_string()),
        ..MetadataRecord::default()
    }
}
