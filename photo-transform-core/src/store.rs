//! Schema 存储：按文件修改时间缓存 `transformation.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::error::{CoreError, CoreResult};
use crate::types::TransformSchema;

/// Default schema file name.
pub const SCHEMA_FILE: &str = "transformation.json";

struct Cached {
    modified: SystemTime,
    schema: Arc<TransformSchema>,
}

/// Loads the transform schema from disk and keeps the parsed copy.
///
/// The file is re-read only when its modification time is newer than the
/// cached one.
pub struct SchemaStore {
    path: PathBuf,
    cache: RwLock<Option<Cached>>,
}

impl SchemaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Store for `transformation.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SCHEMA_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached schema, reloading it if the file changed.
    pub fn get(&self) -> CoreResult<Arc<TransformSchema>> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| CoreError::Io(format!("{}: {e}", self.path.display())))?;

        {
            let cache = self
                .cache
                .read()
                .map_err(|_| CoreError::Io("schema cache lock poisoned".to_string()))?;
            if let Some(cached) = cache.as_ref()
                && cached.modified >= modified
            {
                return Ok(Arc::clone(&cached.schema));
            }
        }

        let text = fs::read_to_string(&self.path)
            .map_err(|e| CoreError::Io(format!("{}: {e}", self.path.display())))?;
        let schema = Arc::new(TransformSchema::from_json_str(&text)?);
        log::info!(
            "Loaded transform schema from {} ({} qualifiers)",
            self.path.display(),
            schema.qualifiers().len()
        );

        let mut cache = self
            .cache
            .write()
            .map_err(|_| CoreError::Io("schema cache lock poisoned".to_string()))?;
        *cache = Some(Cached {
            modified,
            schema: Arc::clone(&schema),
        });
        Ok(schema)
    }

    /// Drops the cached copy; the next [`Self::get`] reads the file again.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }
}
