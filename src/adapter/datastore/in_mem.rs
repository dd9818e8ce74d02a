use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// rows are stringly typed on purpose, each repository owns the codec
// between its models and the row layout
pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, k: &String, v: &Vec<String>) -> bool;
}

// the datastore is shared among sessions, a mutate-then-persist
// sequence in a repository has to happen behind one lock acquisition
#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    tables: Mutex<AppInMemFetchedData>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            tables: Mutex::new(HashMap::new()),
        }
    }

    fn lock_guard(
        &self,
    ) -> DefaultResult<std::sync::MutexGuard<'_, AppInMemFetchedData>, AppError> {
        self.tables.lock().map_err(|e| AppError {
            code: AppErrorCode::AcquireLockFailure,
            detail: Some(e.to_string()),
        })
    }

    fn table_missing_err(label: &str) -> AppError {
        AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        }
    }
}

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.lock_guard()?;
        if !guard.contains_key(label) {
            guard.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut guard = self.lock_guard()?;
        // validate all the table labels before making any change
        for label in data.keys() {
            let t = guard
                .get(label)
                .ok_or_else(|| Self::table_missing_err(label))?;
            let num_new = data[label].keys().filter(|k| !t.contains_key(*k)).count();
            if t.len() + num_new > (self.max_items_per_table as usize) {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!("table:{}, limit:{}", label, self.max_items_per_table)),
                });
            }
        }
        let mut num_saved = 0;
        for (label, rows) in data {
            if let Some(t) = guard.get_mut(label.as_str()) {
                num_saved += rows.len();
                t.extend(rows);
            }
        }
        Ok(num_saved)
    } // end of fn save

    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let guard = self.lock_guard()?;
        let mut out = HashMap::new();
        for (label, key_list) in keys {
            let t = guard
                .get(label.as_str())
                .ok_or_else(|| Self::table_missing_err(label.as_str()))?;
            let rows = key_list
                .into_iter()
                .filter_map(|k| t.get(&k).map(|row| (k, row.clone())))
                .collect::<AppInMemFetchedSingleTable>();
            out.insert(label, rows);
        }
        Ok(out)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut guard = self.lock_guard()?;
        let mut num_del = 0;
        for (label, key_list) in info {
            let t = guard
                .get_mut(label.as_str())
                .ok_or_else(|| Self::table_missing_err(label.as_str()))?;
            for k in key_list {
                if t.remove(&k).is_some() {
                    num_del += 1;
                }
            }
        }
        Ok(num_del)
    }

    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let guard = self.lock_guard()?;
        let t = guard
            .get(table.as_str())
            .ok_or_else(|| Self::table_missing_err(table.as_str()))?;
        let out = t
            .iter()
            .filter(|(k, v)| op.filter(k, v))
            .map(|(k, _v)| k.clone())
            .collect::<Vec<_>>();
        Ok(out)
    }
} // end of impl AppInMemoryDStore
