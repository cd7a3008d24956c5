//! Content loaders for reading combat data from files.
//!
//! RON carries ability books and encounters, TOML carries the combat
//! configuration. Every loader returns plain `combat-core` types.

pub mod abilities;
pub mod config;
pub mod encounter;
pub mod factory;

pub use abilities::{AbilityBookLoader, AbilityCatalog};
pub use config::ConfigLoader;
pub use encounter::EncounterLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
