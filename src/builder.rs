//! Assemble a metadata record for a model folder and install it there.
//!
//! Building is split from installing: `build()` only reads inputs and
//! validates them, so any validation failure leaves the model folder
//! untouched. `MetadataPlan::install()` then copies the mechanism file and
//! writes `metadata.yaml`, in that order, with no rollback.

use crate::Result;
use crate::metadata::{METADATA_FILE, MetadataRecord};
use crate::source::MechanismSource;
use anyhow::{Context, bail};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    model_folder: PathBuf,
    source: MechanismSource,
    template: Option<MetadataRecord>,
    version: Option<f64>,
}

/// A validated record plus the file operations needed to install it.
#[derive(Debug, Clone)]
pub struct MetadataPlan {
    pub model_folder: PathBuf,
    pub mechanism_path: PathBuf,
    /// Raw base name of the mechanism file; `record.mechanism` is its
    /// lossy UTF-8 form.
    pub mechanism_file: OsString,
    pub record: MetadataRecord,
}

impl MetadataBuilder {
    pub fn new(model_folder: impl Into<PathBuf>, source: MechanismSource) -> Self {
        Self {
            model_folder: model_folder.into(),
            source,
            template: None,
            version: None,
        }
    }

    /// Start from a template instead of the fixed defaults.
    pub fn template(mut self, template: MetadataRecord) -> Self {
        self.template = Some(template);
        self
    }

    pub fn version(mut self, version: f64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn build(&self) -> Result<MetadataPlan> {
        let resolved = self.source.resolve()?;

        let mut record = self.template.clone().unwrap_or_default();
        record.name = final_component(&self.model_folder)
            .with_context(|| format!("model folder {}", self.model_folder.display()))?
            .to_string_lossy()
            .into_owned();
        let mechanism_file = final_component(&resolved.path)
            .with_context(|| format!("mechanism file {}", resolved.path.display()))?;
        record.mechanism = mechanism_file.to_string_lossy().into_owned();
        if let Some(version) = self.version {
            record.version = version;
        }
        if let Some(initializers) = resolved.initializers {
            record.initializers = Some(initializers);
        }

        debug!(name = %record.name, mechanism = %record.mechanism, "built metadata record");

        Ok(MetadataPlan {
            model_folder: self.model_folder.clone(),
            mechanism_path: resolved.path,
            mechanism_file,
            record,
        })
    }

    /// Build, then install. Returns the path of the written metadata file.
    pub fn run(&self) -> Result<PathBuf> {
        self.build()?.install()
    }
}

impl MetadataPlan {
    /// Where the mechanism file gets copied to.
    pub fn mechanism_target(&self) -> PathBuf {
        self.model_folder.join(&self.mechanism_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.model_folder.join(METADATA_FILE)
    }

    /// Copy the mechanism file into the model folder (overwriting), then
    /// write `metadata.yaml`. A mechanism file already in place is left as is.
    pub fn install(&self) -> Result<PathBuf> {
        let target = self.mechanism_target();
        if same_file(&self.mechanism_path, &target)? {
            debug!(path = %target.display(), "mechanism file already in model folder, not copying");
        } else {
            fs::copy(&self.mechanism_path, &target).with_context(|| {
                format!(
                    "copy mechanism file {} to {}",
                    self.mechanism_path.display(),
                    target.display()
                )
            })?;
            info!(from = %self.mechanism_path.display(), to = %target.display(), "copied mechanism file");
        }

        let out = self.metadata_path();
        self.record.write(&out)?;
        info!(path = %out.display(), "wrote metadata");
        Ok(out)
    }
}

/// Whether both paths name the same existing file. `fs::copy` onto itself
/// truncates the file, so this has to be checked first.
fn same_file(src: &Path, dst: &Path) -> Result<bool> {
    if !dst.exists() {
        return Ok(false);
    }
    let src = src
        .canonicalize()
        .with_context(|| format!("resolve mechanism file {}", src.display()))?;
    let dst = dst
        .canonicalize()
        .with_context(|| format!("resolve {}", dst.display()))?;
    Ok(src == dst)
}

/// Final path component. Paths like `.` or `models/..` have none lexically,
/// so those fall back to the canonical path.
fn final_component(path: &Path) -> Result<OsString> {
    if let Some(name) = path.file_name() {
        return Ok(name.to_os_string());
    }
    let canonical = path
        .canonicalize()
        .with_context(|| format!("resolve {}", path.display()))?;
    match canonical.file_name() {
        Some(name) => Ok(name.to_os_string()),
        None => bail!("{} has no final path component", path.display()),
    }
}
