use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::ServiceError;

/// Persists the serialized session snapshot across process restarts.
///
/// The payload is an opaque JSON string; the session store owns the
/// schema. Resource stores are never persisted.
pub trait SessionStorage: Send + Sync + Debug {
    fn save(&self, snapshot: &str) -> Result<(), ServiceError>;

    fn load(&self) -> Result<Option<String>, ServiceError>;
}

/// Snapshot file on disk.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileSessionStorage {
    fn save(&self, snapshot: &str) -> Result<(), ServiceError> {
        std::fs::write(&self.path, snapshot)
            .map_err(|e| ServiceError::unavailable(format!("session file write failed: {e}")))
    }

    fn load(&self) -> Result<Option<String>, ServiceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::unavailable(format!(
                "session file read failed: {e}"
            ))),
        }
    }
}

/// Snapshot slot in memory, for tests and ephemeral embeddings.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn save(&self, snapshot: &str) -> Result<(), ServiceError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, ServiceError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
