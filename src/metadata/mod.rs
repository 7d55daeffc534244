//! Metadata layer: the `metadata.yaml` record and the templates it can be
//! seeded from.

pub mod record;
pub mod template;

pub use record::{METADATA_FILE, MetadataRecord};
