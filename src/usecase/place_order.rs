use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::Local;

use crate::api::dto::{OrderConfirmDto, PaymentMethodDto};
use crate::config::AppSideEffectRetryCfg;
use crate::constant::app_meta;
use crate::error::AppError;
use crate::generate_custom_uid;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    BillingInfoModel, CheckoutStepError, OrderModel, OutboxTaskKind, OutboxTaskModel,
    PaymentMethodModel, PriceQuoteModel,
};
use crate::repository::{AbsCartRepo, AbsOutboxRepo};
use crate::thirdparty::{
    AbstractOrderClient, AbstractPaymentProcessor, AbstractSubscriptionClient, AppThirdPartyError,
    AppThirdPartyErrorReason,
};

use super::checkout::AppCheckoutSessionHandle;
use super::invoke_with_retry;

pub enum PlaceOrderUcResult {
    Completed(OrderConfirmDto),
    // guard refusals before any side effect runs, submission not started
    Rejected(CheckoutStepError),
    PaymentDeclined(String),
    EmptyCart,
    ServerError(AppError),
}

/// Runs the whole submission sequence, charge first, then the
/// best-effort side effects, then the cart clear. There is no
/// cancellation token, dropping the returned future abandons whatever
/// collaborator call is in flight.
pub struct PlaceOrderUseCase {
    pub processor: Arc<Box<dyn AbstractPaymentProcessor>>,
    pub subscription: Arc<Box<dyn AbstractSubscriptionClient>>,
    pub order_client: Arc<Box<dyn AbstractOrderClient>>,
    pub cart_repo: Box<dyn AbsCartRepo>,
    pub outbox_repo: Box<dyn AbsOutboxRepo>,
    pub retry_cfg: AppSideEffectRetryCfg,
    pub tax_rate_percent: u8,
    pub log_ctx: Arc<AppLogContext>,
}

impl PlaceOrderUseCase {
    // the session lock is held only while flipping the submitting flag,
    // concurrent triggers past the first one observe `AlreadySubmitting`
    // and every side effect below runs at most once
    pub async fn execute(
        self,
        sess: &AppCheckoutSessionHandle,
        method: PaymentMethodDto,
    ) -> PlaceOrderUcResult {
        let (session_id, method_m, billing) = {
            let mut guard = sess.lock().await;
            match guard.begin_submission(method) {
                Ok((m, b)) => (guard.session.clone(), m, b),
                Err(e) => {
                    return PlaceOrderUcResult::Rejected(e);
                }
            }
        };
        let out = self
            .run_submission(session_id.as_str(), method_m, billing)
            .await;
        let mut guard = sess.lock().await;
        match out {
            Ok(confirm) => {
                guard.complete_submission();
                PlaceOrderUcResult::Completed(confirm)
            }
            Err(aborted) => {
                guard.abort_submission();
                aborted
            }
        }
    } // end of fn execute

    async fn run_submission(
        &self,
        session_id: &str,
        method: PaymentMethodModel,
        billing: BillingInfoModel,
    ) -> DefaultResult<OrderConfirmDto, PlaceOrderUcResult> {
        let logctx_p = &self.log_ctx;
        let cart = match self.cart_repo.fetch_cart(session_id).await {
            Ok(v) => v,
            Err(e) => {
                app_log_event!(
                    logctx_p,
                    AppLogLevel::ERROR,
                    "session:{}, {:?}",
                    session_id,
                    e
                );
                return Err(PlaceOrderUcResult::ServerError(e));
            }
        };
        if cart.is_empty() {
            return Err(PlaceOrderUcResult::EmptyCart);
        }
        let quote = PriceQuoteModel::evaluate(&cart, self.tax_rate_percent);
        let payin = match self.processor.pay_in(quote.total, &method).await {
            Ok(v) => v,
            Err(e) => {
                app_log_event!(
                    logctx_p,
                    AppLogLevel::WARNING,
                    "session:{}, amount:{}, {:?}",
                    session_id,
                    quote.total,
                    e
                );
                let detail = match e.reason {
                    AppThirdPartyErrorReason::Declined(msg) => msg,
                    _others => format!("{:?}", _others),
                };
                return Err(PlaceOrderUcResult::PaymentDeclined(detail));
            }
        };
        app_log_event!(
            logctx_p,
            AppLogLevel::DEBUG,
            "session:{}, authorization:{}",
            session_id,
            payin.authorization_id
        );
        // subscription activations run sequentially after the charge,
        // a failed plan never blocks the rest of the sequence
        for plan_id in cart.subscription_plan_ids() {
            let outcome =
                invoke_with_retry(&self.retry_cfg, || self.subscription.activate(plan_id)).await;
            if let Err((e, attempts)) = outcome {
                app_log_event!(
                    logctx_p,
                    AppLogLevel::WARNING,
                    "session:{}, plan:{}, attempts:{}, {:?}",
                    session_id,
                    plan_id,
                    attempts,
                    e
                );
                self.record_outbox(OutboxTaskKind::SubscriptionActivate { plan_id }, attempts, &e)
                    .await;
            }
        }
        let oid = generate_custom_uid(app_meta::MACHINE_CODE)
            .simple()
            .to_string();
        let create_time = Local::now().fixed_offset();
        let order_m = OrderModel::snapshot(oid.clone(), &cart, quote, billing, method, create_time);
        let req = order_m.to_register_req(PriceQuoteModel::discount_percent(&cart));
        let registered =
            invoke_with_retry(&self.retry_cfg, || self.order_client.register(req.clone())).await;
        let server_order = match registered {
            Ok(v) => Some(v),
            Err((e, attempts)) => {
                // the charge already settled, the customer still sees a
                // confirmed checkout while the record waits in the outbox
                app_log_event!(
                    logctx_p,
                    AppLogLevel::ERROR,
                    "session:{}, display-ref:{}, attempts:{}, {:?}",
                    session_id,
                    oid,
                    attempts,
                    e
                );
                self.record_outbox(
                    OutboxTaskKind::OrderRegister {
                        payload: req.clone(),
                    },
                    attempts,
                    &e,
                )
                .await;
                None
            }
        };
        // the single authorized cart clear in the whole flow, taken
        // under the session write lock so a late cart edit cannot
        // interleave with the removal
        let cleared = match self.cart_repo.lock_session(session_id).await {
            Ok(_wr_guard) => self.cart_repo.discard(session_id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = cleared {
            app_log_event!(
                logctx_p,
                AppLogLevel::ERROR,
                "session:{}, cart-clear, {:?}",
                session_id,
                e
            );
        }
        Ok(OrderConfirmDto {
            display_ref: oid,
            server_order,
        })
    } // end of fn run_submission

    async fn record_outbox(&self, kind: OutboxTaskKind, attempts: u32, cause: &AppThirdPartyError) {
        let task = OutboxTaskModel {
            task_id: generate_custom_uid(app_meta::MACHINE_CODE)
                .simple()
                .to_string(),
            kind,
            attempts,
            last_error: format!("{:?}", cause),
            create_time: Local::now().fixed_offset(),
        };
        if let Err(e) = self.outbox_repo.save(task).await {
            let logctx_p = &self.log_ctx;
            app_log_event!(logctx_p, AppLogLevel::ERROR, "outbox-save, {:?}", e);
        }
    }
} // end of impl PlaceOrderUseCase
