use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod api;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod usecase;

mod config;
pub use config::{
    AppBasepathCfg, AppCheckoutServiceCfg, AppConfig, AppCouponCfg, AppCouponKindCfg,
    AppDataStoreCfg, AppInMemoryDbCfg, AppLocalFsSlotCfg, AppLogHandlerCfg, AppLoggerCfg,
    AppLoggingCfg, AppPaymentProcessorCfg, AppSideEffectRetryCfg,
};

mod adapter;
pub use adapter::{datastore, thirdparty};

type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
    pub local_fs: Option<Arc<datastore::AppLocalFsSlotStore>>,
    pub sess_locks: Arc<datastore::AppSessionLockRegistry>,
}

// state shared by all sessions of the service process
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _3pty: Arc<thirdparty::AppThirdPartyContext>,
}

impl AppSharedState {
    pub fn new(cfg: AppConfig, log: logging::AppLogContext) -> Self {
        let log = Arc::new(log);
        let (in_mem, local_fs) = datastore::build_context(
            log.clone(),
            &cfg.basepath,
            &cfg.service.data_store,
        );
        let in_mem = in_mem.map(Arc::new);
        let local_fs = local_fs.map(Arc::new);
        let ds_ctx = Arc::new(AppDataStoreContext {
            in_mem,
            local_fs,
            sess_locks: Arc::new(datastore::AppSessionLockRegistry::new()),
        });
        let t_ctx = thirdparty::build_context(&cfg.service.payment_processor, log.clone());
        Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _3pty: Arc::new(t_ctx),
        }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn thirdparty(&self) -> Arc<thirdparty::AppThirdPartyContext> {
        self._3pty.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _3pty: self._3pty.clone(),
        }
    }
}

pub(crate) fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv8 keeps the layout custom, the first byte of the random tail
    // carries the machine code so ids stay unique across nodes while the
    // timestamp prefix keeps them roughly sortable
    let ts_ctx = NoContext;
    let (secs, nano) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}
