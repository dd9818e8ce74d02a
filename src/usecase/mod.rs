mod checkout;
mod manage_cart;
mod place_order;

use std::future::Future;
use std::time::Duration;

use crate::adapter::thirdparty::AppThirdPartyError;
use crate::config::AppSideEffectRetryCfg;

pub use checkout::{
    AppCheckoutSessionHandle, ProceedToBillingUcResult, ProceedToBillingUseCase, StepBackUcResult,
    StepBackUseCase, SubmitBillingUcResult, SubmitBillingUseCase,
};
pub use manage_cart::{
    AddCartLineUcResult, AddCartLineUseCase, ApplyCouponUcResult, ApplyCouponUseCase,
    DiscardCartUcResult, DiscardCartUseCase, RemoveCartLineUcResult, RemoveCartLineUseCase,
    RemoveCouponUcResult, RemoveCouponUseCase, RetrieveCartUcResult, RetrieveCartUseCase,
    SelectShippingUcResult, SelectShippingUseCase, SetLineQuantityUcResult,
    SetLineQuantityUseCase,
};
pub use place_order::{PlaceOrderUcResult, PlaceOrderUseCase};

// bounded retry with exponential backoff, applied only to the two
// best-effort side effects of the submission sequence, the error of
// the final attempt is reported with the number of attempts spent
pub(crate) async fn invoke_with_retry<T, F, Fut>(
    policy: &AppSideEffectRetryCfg,
    mut op: F,
) -> Result<T, (AppThirdPartyError, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppThirdPartyError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(v) => {
                return Ok(v);
            }
            Err(e) => {
                if attempt >= policy.max_attempts {
                    return Err((e, attempt));
                }
                let backoff = policy.base_delay_ms.saturating_mul(1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }
        }
    }
}
