use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::config::AppCouponCfg;
use crate::error::{AppError, AppErrorCode};
use crate::logging::AppLogContext;
use crate::model::{CartModel, CouponModel, OutboxTaskModel};
use crate::AppDataStoreContext;

mod in_mem;
// make in-memory repo visible only for testing purpose
pub use in_mem::cart::CartInMemRepo;
pub use in_mem::coupon::CouponInMemRepo;
pub use in_mem::outbox::OutboxInMemRepo;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different threads
// , it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsCartRepo: Sync + Send {
    // callers mutating a cart hold this guard from the fetch until the
    // update lands, so two tasks on one session never overwrite each
    // other's write
    async fn lock_session(&self, session: &str)
        -> DefaultResult<OwnedMutexGuard<()>, AppError>;

    // replaces the saved state of the session cart and persists the
    // snapshot to the durable slot in the same call
    async fn update(&self, obj: CartModel) -> DefaultResult<usize, AppError>;

    async fn discard(&self, session: &str) -> DefaultResult<(), AppError>;

    // an absent or corrupt persisted snapshot yields an empty cart,
    // never an error visible to the caller
    async fn fetch_cart(&self, session: &str) -> DefaultResult<CartModel, AppError>;
}

#[async_trait]
pub trait AbsCouponRepo: Sync + Send {
    async fn fetch_by_code(&self, code: &str) -> DefaultResult<Option<CouponModel>, AppError>;
}

#[async_trait]
pub trait AbsOutboxRepo: Sync + Send {
    async fn save(&self, task: OutboxTaskModel) -> DefaultResult<(), AppError>;

    async fn fetch_all(&self) -> DefaultResult<Vec<OutboxTaskModel>, AppError>;
}

pub async fn app_repo_cart(
    ds: Arc<AppDataStoreContext>,
    logctx: Arc<AppLogContext>,
) -> DefaultResult<Box<dyn AbsCartRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = CartInMemRepo::new(
            m.clone(),
            ds.local_fs.clone(),
            ds.sess_locks.clone(),
            logctx,
        )
        .await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub async fn app_repo_outbox(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOutboxRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = OutboxInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub fn app_repo_coupon(cfg: &[AppCouponCfg]) -> Box<dyn AbsCouponRepo> {
    Box::new(CouponInMemRepo::build(cfg))
}
