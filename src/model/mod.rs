mod billing;
mod cart;
mod checkout;
mod order;
mod pricing;

use crate::constant::ProductKind;

pub use billing::BillingInfoModel;
pub use cart::{
    BillingInterval, CartLineModel, CartModel, CouponKind, CouponModel, RecurringChargeModel,
    ShippingMethod, ShippingSelectionModel,
};
pub use checkout::{
    CardInfoModel, CheckoutSessionModel, CheckoutStep, CheckoutStepError, PaymentMethodModel,
};
pub use order::{OrderModel, OutboxTaskKind, OutboxTaskModel};
pub use pricing::PriceQuoteModel;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineIdentity {
    pub product_id: u64,
    pub kind: ProductKind,
}
