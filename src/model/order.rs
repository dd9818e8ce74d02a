use chrono::{DateTime, FixedOffset};

use crate::api::dto::{CartLineDto, OrderReqDto};

use super::billing::BillingInfoModel;
use super::cart::CartModel;
use super::checkout::PaymentMethodModel;
use super::pricing::PriceQuoteModel;

// immutable snapshot assembled once per successful checkout, `oid` is
// the client-generated display reference, the order collaborator
// assigns its own id separately
pub struct OrderModel {
    pub oid: String,
    pub lines: Vec<crate::model::CartLineModel>,
    pub amount: PriceQuoteModel,
    pub billing: BillingInfoModel,
    pub payment_method: PaymentMethodModel,
    pub create_time: DateTime<FixedOffset>,
}

impl OrderModel {
    pub fn snapshot(
        oid: String,
        cart: &CartModel,
        amount: PriceQuoteModel,
        billing: BillingInfoModel,
        payment_method: PaymentMethodModel,
        create_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            oid,
            lines: cart.lines.clone(),
            amount,
            billing,
            payment_method,
            create_time,
        }
    }

    pub fn to_register_req(&self, discount_percent: rust_decimal::Decimal) -> OrderReqDto {
        OrderReqDto {
            items: self
                .lines
                .iter()
                .cloned()
                .map(CartLineDto::from)
                .collect::<Vec<_>>(),
            subtotal: self.amount.subtotal,
            tax: self.amount.tax,
            discount_percent,
            total: self.amount.total,
            billing: self.billing.clone().into(),
            payment_method: self.payment_method.label().to_string(),
        }
    }
} // end of impl OrderModel

pub enum OutboxTaskKind {
    SubscriptionActivate { plan_id: u64 },
    OrderRegister { payload: OrderReqDto },
}

impl OutboxTaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SubscriptionActivate { .. } => "subscription-activate",
            Self::OrderRegister { .. } => "order-register",
        }
    }
}

// retriable reconciliation record for a best-effort side effect which
// exhausted its retry budget, audited instead of silently dropped
pub struct OutboxTaskModel {
    pub task_id: String,
    pub kind: OutboxTaskKind,
    pub attempts: u32,
    pub last_error: String,
    pub create_time: DateTime<FixedOffset>,
}
