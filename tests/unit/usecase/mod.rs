mod checkout;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use rust_decimal::Decimal;
use tokio::sync::Mutex as AsyncMutex;

use storefront_checkout::api::dto::{OrderRegisteredDto, OrderReqDto};
use storefront_checkout::model::{CartModel, CheckoutSessionModel, PaymentMethodModel};
use storefront_checkout::repository::{app_repo_cart, AbsCartRepo};
use storefront_checkout::thirdparty::{
    AbstractOrderClient, AbstractPaymentProcessor, AbstractSubscriptionClient, AppPayInResult,
    AppThirdPartyError, AppThirdPartyErrorReason, AppThirdPartyFnLabel,
};
use storefront_checkout::usecase::AppCheckoutSessionHandle;
use storefront_checkout::AppSharedState;

use crate::model::ut_valid_billing_dto;
use crate::ut_setup_share_state;

pub(super) struct MockPaymentProcessor {
    pub(super) decline: bool,
    pub(super) delay_ms: u64,
    pub(super) num_calls: Arc<AtomicU32>,
}

#[async_trait]
impl AbstractPaymentProcessor for MockPaymentProcessor {
    async fn pay_in(
        &self,
        _amount: Decimal,
        _method: &PaymentMethodModel,
    ) -> DefaultResult<AppPayInResult, AppThirdPartyError> {
        self.num_calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.decline {
            Err(AppThirdPartyError {
                reason: AppThirdPartyErrorReason::Declined("mock-decline".to_string()),
                fn_label: AppThirdPartyFnLabel::PayIn,
            })
        } else {
            Ok(AppPayInResult {
                authorization_id: "mock-auth-0001".to_string(),
                create_time: Local::now().fixed_offset(),
            })
        }
    }
}

pub(super) struct MockSubscriptionClient {
    pub(super) fail: bool,
    pub(super) num_calls: Arc<AtomicU32>,
}

#[async_trait]
impl AbstractSubscriptionClient for MockSubscriptionClient {
    async fn activate(&self, _plan_id: u64) -> DefaultResult<(), AppThirdPartyError> {
        self.num_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppThirdPartyError {
                reason: AppThirdPartyErrorReason::NetworkUnavail,
                fn_label: AppThirdPartyFnLabel::ActivateSubscription,
            })
        } else {
            Ok(())
        }
    }
}

pub(super) struct MockOrderClient {
    pub(super) fail: bool,
    pub(super) num_calls: Arc<AtomicU32>,
}

#[async_trait]
impl AbstractOrderClient for MockOrderClient {
    async fn register(
        &self,
        _req: OrderReqDto,
    ) -> DefaultResult<OrderRegisteredDto, AppThirdPartyError> {
        self.num_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppThirdPartyError {
                reason: AppThirdPartyErrorReason::NetworkUnavail,
                fn_label: AppThirdPartyFnLabel::RegisterOrder,
            })
        } else {
            Ok(OrderRegisteredDto {
                id: "mock-order-0001".to_string(),
                create_time: Local::now().fixed_offset(),
            })
        }
    }
}

pub(super) fn ut_arc_processor(m: MockPaymentProcessor) -> Arc<Box<dyn AbstractPaymentProcessor>> {
    let b: Box<dyn AbstractPaymentProcessor> = Box::new(m);
    Arc::new(b)
}

pub(super) fn ut_arc_subscription(
    m: MockSubscriptionClient,
) -> Arc<Box<dyn AbstractSubscriptionClient>> {
    let b: Box<dyn AbstractSubscriptionClient> = Box::new(m);
    Arc::new(b)
}

pub(super) fn ut_arc_order(m: MockOrderClient) -> Arc<Box<dyn AbstractOrderClient>> {
    let b: Box<dyn AbstractOrderClient> = Box::new(m);
    Arc::new(b)
}

pub(super) async fn ut_cart_repo(shr_state: &AppSharedState) -> Box<dyn AbsCartRepo> {
    app_repo_cart(shr_state.datastore(), shr_state.log_context().clone())
        .await
        .unwrap()
}

// saves the given cart, then walks a checkout session to the payment
// step so submission tests start from a valid state
pub(super) async fn ut_session_at_payment(
    shr_state: &AppSharedState,
    cart: CartModel,
) -> AppCheckoutSessionHandle {
    let repo = ut_cart_repo(shr_state).await;
    repo.update(cart.clone()).await.unwrap();
    let mut sess = CheckoutSessionModel::new(cart.session.clone());
    sess.advance_to_billing(&cart).unwrap();
    sess.advance_to_payment(ut_valid_billing_dto()).unwrap();
    Arc::new(AsyncMutex::new(sess))
}

pub(super) fn ut_share_state() -> AppSharedState {
    ut_setup_share_state("config_ok.json")
}
