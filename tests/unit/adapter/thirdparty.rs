use rust_decimal::Decimal;

use storefront_checkout::api::dto::ProductKindDto;
use storefront_checkout::model::PaymentMethodModel;
use storefront_checkout::thirdparty::{
    AbstractOrderClient, AbstractPaymentProcessor, AppSimulatedOrderClient,
    AppSimulatedPaymentProcessor, AppThirdPartyErrorReason,
};
use storefront_checkout::AppPaymentProcessorCfg;

use crate::model::{ut_default_cart_line, ut_valid_billing_dto};
use crate::ut_setup_share_state;

#[tokio::test]
async fn simulated_processor_approves() {
    let shr_state = ut_setup_share_state("config_ok.json");
    let cfg = AppPaymentProcessorCfg {
        processing_delay_ms: 2,
        decline_all: false,
    };
    let processor = AppSimulatedPaymentProcessor::new(&cfg, shr_state.log_context().clone());
    let amount = "22.39".parse::<Decimal>().unwrap();
    let result = processor.pay_in(amount, &PaymentMethodModel::Wallet).await;
    let payin = result.unwrap();
    assert!(!payin.authorization_id.is_empty());
}

#[tokio::test]
async fn simulated_processor_declines() {
    let shr_state = ut_setup_share_state("config_ok.json");
    let cfg = AppPaymentProcessorCfg {
        processing_delay_ms: 2,
        decline_all: true,
    };
    let processor = AppSimulatedPaymentProcessor::new(&cfg, shr_state.log_context().clone());
    let amount = "22.39".parse::<Decimal>().unwrap();
    let result = processor.pay_in(amount, &PaymentMethodModel::Crypto).await;
    let e = result.unwrap_err();
    assert!(matches!(e.reason, AppThirdPartyErrorReason::Declined(_)));
}

#[tokio::test]
async fn simulated_order_client_registers() {
    let shr_state = ut_setup_share_state("config_ok.json");
    let client = AppSimulatedOrderClient::new(shr_state.log_context().clone());
    let req = storefront_checkout::api::dto::OrderReqDto {
        items: vec![ut_default_cart_line(9, ProductKindDto::Product, "12.00", 1)],
        subtotal: "12.00".parse::<Decimal>().unwrap(),
        tax: "1.44".parse::<Decimal>().unwrap(),
        discount_percent: Decimal::ZERO,
        total: "13.44".parse::<Decimal>().unwrap(),
        billing: ut_valid_billing_dto(),
        payment_method: "wallet".to_string(),
    };
    let registered = client.register(req).await.unwrap();
    assert!(!registered.id.is_empty());
}
