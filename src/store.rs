// Snapshot handle around the lookup service. A reload builds a whole
// new `ExtApi` outside the lock and swaps the `Arc` in one step, so a
// reader holding an older snapshot keeps a fully consistent view.

use crate::lookup::ExtApi;
use crate::schema::{self, LoadError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

pub struct ApiStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

struct StoreState {
    api: Arc<ExtApi>,
    mtime: Option<SystemTime>,
}

impl ApiStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let mtime = modified(&path);
        let api = Arc::new(ExtApi::new(schema::load_document(&path)?));
        Ok(Self {
            path,
            state: RwLock::new(StoreState { api, mtime }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cheap handle clone; the snapshot stays valid across later reloads.
    pub fn snapshot(&self) -> Arc<ExtApi> {
        Arc::clone(&self.state.read().unwrap().api)
    }

    /// Rebuild unconditionally. On failure the previous snapshot stays
    /// in place untouched.
    pub fn reload(&self) -> Result<(), LoadError> {
        let mtime = modified(&self.path);
        let api = Arc::new(ExtApi::new(schema::load_document(&self.path)?));
        let mut state = self.state.write().unwrap();
        state.api = api;
        state.mtime = mtime;
        Ok(())
    }

    /// Rebuild only when the document's modification time has advanced.
    /// Returns whether a reload happened.
    pub fn maybe_reload(&self) -> Result<bool, LoadError> {
        let Some(mtime) = modified(&self.path) else {
            return Err(LoadError::NotFound(self.path.clone()));
        };
        let stale = {
            let state = self.state.read().unwrap();
            match state.mtime {
                Some(seen) => mtime > seen,
                None => true,
            }
        };
        if !stale {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
