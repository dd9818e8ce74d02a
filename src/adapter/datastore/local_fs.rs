use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::result::Result as DefaultResult;
use std::sync::Mutex;

use crate::config::{AppBasepathCfg, AppLocalFsSlotCfg};
use crate::error::{AppError, AppErrorCode};

// durable key-value slot backed by one JSON document on local storage,
// this mirrors the browser storage slot of the storefront client, the
// cart survives a process restart through it
pub struct AppLocalFsSlotStore {
    filepath: PathBuf,
    // read-modify-write cycles on the document must not interleave
    flock: Mutex<()>,
}

impl AppLocalFsSlotStore {
    pub fn try_build(
        basepath: &AppBasepathCfg,
        cfg: &AppLocalFsSlotCfg,
    ) -> DefaultResult<Self, AppError> {
        let mut fullpath = basepath.service.clone();
        if !fullpath.ends_with('/') {
            fullpath += "/";
        }
        fullpath += cfg.rel_path.as_str();
        let p = PathBuf::from(fullpath);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            filepath: p,
            flock: Mutex::new(()),
        })
    }

    fn lock_guard(&self) -> DefaultResult<std::sync::MutexGuard<'_, ()>, AppError> {
        self.flock.lock().map_err(|e| AppError {
            code: AppErrorCode::AcquireLockFailure,
            detail: Some(e.to_string()),
        })
    }

    fn load_doc(&self) -> DefaultResult<HashMap<String, String>, AppError> {
        match fs::read_to_string(self.filepath.as_path()) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(raw.as_str()) {
                Ok(doc) => Ok(doc),
                Err(e) => Err(AppError {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(e.to_string()),
                }),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(AppError::from(e)),
        }
    }

    fn store_doc(&self, doc: &HashMap<String, String>) -> DefaultResult<(), AppError> {
        let raw = serde_json::to_string(doc)?;
        fs::write(self.filepath.as_path(), raw)?;
        Ok(())
    }

    // a missing slot yields `None`, a corrupt document propagates
    // `DataCorruption` so the caller can decide to fail open
    pub fn read_slot(&self, key: &str) -> DefaultResult<Option<String>, AppError> {
        let _guard = self.lock_guard()?;
        let doc = self.load_doc()?;
        Ok(doc.get(key).cloned())
    }

    pub fn write_slot(&self, key: &str, value: String) -> DefaultResult<(), AppError> {
        let _guard = self.lock_guard()?;
        // a corrupt document is abandoned on the next write
        let mut doc = self.load_doc().unwrap_or_default();
        doc.insert(key.to_string(), value);
        self.store_doc(&doc)
    }

    pub fn remove_slot(&self, key: &str) -> DefaultResult<(), AppError> {
        let _guard = self.lock_guard()?;
        let mut doc = self.load_doc().unwrap_or_default();
        doc.remove(key);
        self.store_doc(&doc)
    }
} // end of impl AppLocalFsSlotStore
