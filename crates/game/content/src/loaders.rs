//! Loaders that read content tables from RON data files.

use std::path::Path;

use crate::tables::ContentTables;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Loader for [`ContentTables`] from RON files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load content tables from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        Self::from_ron(&content)
    }

    /// Parse content tables from RON source.
    pub fn from_ron(source: &str) -> LoadResult<ContentTables> {
        ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse content tables RON: {}", e))
    }
}
