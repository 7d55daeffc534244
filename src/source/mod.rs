//! Where the mechanism file comes from.

pub mod ic;

pub use ic::InitialConditionConfig;

use crate::Result;
use serde_yaml::Value;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum MechanismSource {
    /// Path to the mechanism file itself.
    Direct(PathBuf),
    /// Path to an initial-condition config naming the mechanism file.
    InitialCondition(PathBuf),
}

/// Mechanism file location plus whatever else the source contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMechanism {
    pub path: PathBuf,
    pub initializers: Option<Value>,
}

impl MechanismSource {
    /// Read (and validate) the source. Never touches the filesystem beyond
    /// reading the config file.
    pub fn resolve(&self) -> Result<ResolvedMechanism> {
        match self {
            MechanismSource::Direct(path) => Ok(ResolvedMechanism {
                path: path.clone(),
                initializers: None,
            }),
            MechanismSource::InitialCondition(cfg_path) => {
                let cfg = InitialConditionConfig::load(cfg_path)?;
                debug!(
                    config = %cfg_path.display(),
                    mechanism = %cfg.mechanism.display(),
                    "resolved mechanism from initial-condition config"
                );
                Ok(ResolvedMechanism {
                    path: cfg.mechanism,
                    initializers: Some(cfg.initializers),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn direct_source_is_passed_through() {
        let src = MechanismSource::Direct(PathBuf::from("mechs/GRIMech30.yaml"));
        assert_eq!(
            src.resolve().unwrap(),
            ResolvedMechanism {
                path: PathBuf::from("mechs/GRIMech30.yaml"),
                initializers: None,
            }
        );
    }

    #[test]
    fn initial_condition_source_reads_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = dir.path().join("ic.yaml");
        fs::write(&cfg, "mechanism: foo.yaml\ninitializers: {a: 1}\n").unwrap();

        let resolved = MechanismSource::InitialCondition(cfg).resolve().unwrap();
        assert_eq!(resolved.path, dir.path().join("foo.yaml"));
        assert!(resolved.initializers.is_some());
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = MechanismSource::InitialCondition(dir.path().join("absent.yaml"))
            .resolve()
            .unwrap_err();
        assert!(err.to_string().contains("read initial-condition config"));
    }
}
