use std::boxed::Box;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::dto::BillingInfoDto;
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{CheckoutSessionModel, CheckoutStep, CheckoutStepError};
use crate::repository::AbsCartRepo;

// one handle per customer session, shared between the navigation
// use-cases and the submission sequence
pub type AppCheckoutSessionHandle = Arc<Mutex<CheckoutSessionModel>>;

pub enum ProceedToBillingUcResult {
    Success,
    Failure(CheckoutStepError),
    ServerError(AppError),
}

pub struct ProceedToBillingUseCase {
    pub cart_repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl ProceedToBillingUseCase {
    pub async fn execute(self, sess: &AppCheckoutSessionHandle) -> ProceedToBillingUcResult {
        let session_id = {
            let guard = sess.lock().await;
            guard.session.clone()
        };
        // the guard re-reads the saved cart, a stale snapshot kept by the
        // caller must never let an emptied cart pass
        let cart = match self.cart_repo.fetch_cart(session_id.as_str()).await {
            Ok(v) => v,
            Err(e) => {
                let logctx_p = &self.log_ctx;
                app_log_event!(
                    logctx_p,
                    AppLogLevel::ERROR,
                    "session:{}, {:?}",
                    session_id,
                    e
                );
                return ProceedToBillingUcResult::ServerError(e);
            }
        };
        let mut guard = sess.lock().await;
        match guard.advance_to_billing(&cart) {
            Ok(()) => ProceedToBillingUcResult::Success,
            Err(e) => ProceedToBillingUcResult::Failure(e),
        }
    }
} // end of impl ProceedToBillingUseCase

pub enum SubmitBillingUcResult {
    Success,
    Failure(CheckoutStepError),
}

pub struct SubmitBillingUseCase;

impl SubmitBillingUseCase {
    pub async fn execute(
        self,
        sess: &AppCheckoutSessionHandle,
        data: BillingInfoDto,
    ) -> SubmitBillingUcResult {
        let mut guard = sess.lock().await;
        match guard.advance_to_payment(data) {
            Ok(()) => SubmitBillingUcResult::Success,
            Err(e) => SubmitBillingUcResult::Failure(e),
        }
    }
}

pub enum StepBackUcResult {
    Success(CheckoutStep),
    Failure(CheckoutStepError),
}

pub struct StepBackUseCase;

impl StepBackUseCase {
    pub async fn execute(self, sess: &AppCheckoutSessionHandle) -> StepBackUcResult {
        let mut guard = sess.lock().await;
        match guard.step_back() {
            Ok(step) => StepBackUcResult::Success(step),
            Err(e) => StepBackUcResult::Failure(e),
        }
    }
}
