//! Verify an existing model folder the way a model loader would read it:
//! load `metadata.yaml` and look up every file it references relative to the
//! folder.

use crate::Result;
use crate::metadata::{METADATA_FILE, MetadataRecord};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub record: MetadataRecord,
    /// (field, expected location) for every referenced entry that is absent.
    pub missing: Vec<(&'static str, PathBuf)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn check_model_folder(model_folder: &Path) -> Result<CheckReport> {
    let record = MetadataRecord::read(&model_folder.join(METADATA_FILE))?;

    let mut refs: Vec<(&'static str, &str)> = vec![
        ("mechanism", record.mechanism.as_str()),
        ("rpath", record.rpath.as_str()),
        ("wpath", record.wpath.as_str()),
    ];
    if let Some(ipath) = &record.ipath {
        refs.push(("ipath", ipath.as_str()));
    }

    let mut missing = Vec::new();
    for (field, rel) in refs {
        let p = model_folder.join(rel);
        debug!(field, path = %p.display(), "checking");
        if !p.exists() {
            missing.push((field, p));
        }
    }

    Ok(CheckReport { record, missing })
}
