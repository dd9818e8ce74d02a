mod in_mem;
mod local_fs;

use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::{AppBasepathCfg, AppDataStoreCfg};
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use in_mem::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemFetchKeys,
    AppInMemFetchedData, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable, AppInMemUpdateData,
    AppInMemoryDStore,
};
pub use local_fs::AppLocalFsSlotStore;

// one lock cell per session key, handed out to repositories so a
// read-modify-write sequence of one session never interleaves with
// another task mutating the same session
pub struct AppSessionLockRegistry {
    cells: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AppSessionLockRegistry {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub async fn acquire(&self, key: &str) -> DefaultResult<OwnedMutexGuard<()>, AppError> {
        let cell = {
            let mut guard = self.cells.lock().map_err(|e| AppError {
                code: AppErrorCode::AcquireLockFailure,
                detail: Some(e.to_string()),
            })?;
            guard.entry(key.to_string()).or_default().clone()
        };
        Ok(cell.lock_owned().await)
    }
} // end of impl AppSessionLockRegistry

impl Default for AppSessionLockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    basepath: &AppBasepathCfg,
    cfg: &Vec<AppDataStoreCfg>,
) -> (
    Option<Box<dyn AbstInMemoryDStore>>,
    Option<AppLocalFsSlotStore>,
) {
    let mut inmem = None;
    let mut slot = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                inmem = Some(item);
            }
            AppDataStoreCfg::LocalFs(d) => match AppLocalFsSlotStore::try_build(basepath, d) {
                Ok(item) => {
                    slot = Some(item);
                }
                Err(e) => {
                    app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
                }
            },
        }
    }
    (inmem, slot)
}
