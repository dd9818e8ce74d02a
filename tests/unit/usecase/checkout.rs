use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;

use storefront_checkout::api::dto::ProductKindDto;
use storefront_checkout::model::{CartModel, CheckoutSessionModel, CheckoutStep, CheckoutStepError};
use storefront_checkout::repository::AbsCartRepo;
use storefront_checkout::usecase::{
    ProceedToBillingUcResult, ProceedToBillingUseCase, StepBackUcResult, StepBackUseCase,
    SubmitBillingUcResult, SubmitBillingUseCase,
};

use super::{ut_cart_repo, ut_share_state};
use crate::model::{ut_default_cart_line, ut_valid_billing_dto};

#[tokio::test]
async fn proceed_to_billing_refuses_empty_cart() {
    let session = "sess-nav-empty";
    let shr_state = ut_share_state();
    let sess = Arc::new(AsyncMutex::new(CheckoutSessionModel::new(
        session.to_string(),
    )));
    let uc = ProceedToBillingUseCase {
        cart_repo: ut_cart_repo(&shr_state).await,
        log_ctx: shr_state.log_context().clone(),
    };
    let result = uc.execute(&sess).await;
    assert!(matches!(
        result,
        ProceedToBillingUcResult::Failure(CheckoutStepError::EmptyCart)
    ));
    assert_eq!(sess.lock().await.curr_step(), CheckoutStep::Cart);
}

#[tokio::test]
async fn proceed_reads_saved_cart_not_caller_copy() {
    let session = "sess-nav-saved";
    let shr_state = ut_share_state();
    let mut cart = CartModel::new(session.to_string());
    cart.add_line(ut_default_cart_line(601, ProductKindDto::Product, "10.00", 1));
    ut_cart_repo(&shr_state).await.update(cart).await.unwrap();
    let sess = Arc::new(AsyncMutex::new(CheckoutSessionModel::new(
        session.to_string(),
    )));
    let uc = ProceedToBillingUseCase {
        cart_repo: ut_cart_repo(&shr_state).await,
        log_ctx: shr_state.log_context().clone(),
    };
    let result = uc.execute(&sess).await;
    assert!(matches!(result, ProceedToBillingUcResult::Success));
    assert_eq!(sess.lock().await.curr_step(), CheckoutStep::Billing);
}

#[tokio::test]
async fn submit_billing_validation_failure() {
    let session = "sess-nav-bill";
    let shr_state = ut_share_state();
    let mut cart = CartModel::new(session.to_string());
    cart.add_line(ut_default_cart_line(602, ProductKindDto::Product, "10.00", 1));
    ut_cart_repo(&shr_state).await.update(cart).await.unwrap();
    let sess = Arc::new(AsyncMutex::new(CheckoutSessionModel::new(
        session.to_string(),
    )));
    let uc = ProceedToBillingUseCase {
        cart_repo: ut_cart_repo(&shr_state).await,
        log_ctx: shr_state.log_context().clone(),
    };
    uc.execute(&sess).await;
    let mut data = ut_valid_billing_dto();
    data.email = "broken-address".to_string();
    let result = SubmitBillingUseCase.execute(&sess, data).await;
    match result {
        SubmitBillingUcResult::Failure(CheckoutStepError::BillingValidation(e)) => {
            assert!(e.email.is_some());
        }
        _others => panic!("billing guard did not trigger"),
    }
    let result = SubmitBillingUseCase.execute(&sess, ut_valid_billing_dto()).await;
    assert!(matches!(result, SubmitBillingUcResult::Success));
    assert_eq!(sess.lock().await.curr_step(), CheckoutStep::Payment);
}

#[tokio::test]
async fn step_back_navigation() {
    let session = "sess-nav-back";
    let shr_state = ut_share_state();
    let mut cart = CartModel::new(session.to_string());
    cart.add_line(ut_default_cart_line(603, ProductKindDto::Product, "10.00", 1));
    ut_cart_repo(&shr_state).await.update(cart).await.unwrap();
    let sess = Arc::new(AsyncMutex::new(CheckoutSessionModel::new(
        session.to_string(),
    )));
    let uc = ProceedToBillingUseCase {
        cart_repo: ut_cart_repo(&shr_state).await,
        log_ctx: shr_state.log_context().clone(),
    };
    uc.execute(&sess).await;
    SubmitBillingUseCase
        .execute(&sess, ut_valid_billing_dto())
        .await;
    let result = StepBackUseCase.execute(&sess).await;
    assert!(matches!(
        result,
        StepBackUcResult::Success(CheckoutStep::Billing)
    ));
    let result = StepBackUseCase.execute(&sess).await;
    assert!(matches!(result, StepBackUcResult::Success(CheckoutStep::Cart)));
}
