use rust_decimal::{Decimal, RoundingStrategy};

use crate::api::dto::AmountSummaryDto;

use super::cart::{CartModel, CouponKind};

const MONEY_PRECISION: u32 = 2;

// round half-up happens once at presentation of each component, the
// total is composed from the unrounded terms first
fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

// pure pricing computation over one cart snapshot, the canonical total
// combines every term:  subtotal - discount + tax + shipping
#[derive(Debug, Clone)]
pub struct PriceQuoteModel {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceQuoteModel {
    pub fn evaluate(cart: &CartModel, tax_rate_percent: u8) -> Self {
        let subtotal = cart
            .lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum::<Decimal>();
        let discount = match cart.coupon.as_ref() {
            Some(c) => match c.kind {
                CouponKind::Percentage => subtotal * c.value / Decimal::ONE_HUNDRED,
                // a fixed-amount coupon never drives the total negative
                CouponKind::FixedAmount => c.value.min(subtotal),
                CouponKind::FreeShipping => Decimal::ZERO,
            },
            None => Decimal::ZERO,
        };
        let shipping_waived = matches!(
            cart.coupon.as_ref().map(|c| c.kind),
            Some(CouponKind::FreeShipping)
        );
        let shipping_cost = if shipping_waived {
            Decimal::ZERO
        } else {
            cart.shipping.cost
        };
        let tax = subtotal * Decimal::from(tax_rate_percent) / Decimal::ONE_HUNDRED;
        let total = subtotal - discount + tax + shipping_cost;
        Self {
            subtotal: quantize(subtotal),
            discount: quantize(discount),
            shipping_cost: quantize(shipping_cost),
            tax: quantize(tax),
            total: quantize(total),
        }
    } // end of fn evaluate

    // percent figure reported to the order collaborator, only a
    // percentage coupon maps to it directly
    pub fn discount_percent(cart: &CartModel) -> Decimal {
        match cart.coupon.as_ref() {
            Some(c) if c.kind == CouponKind::Percentage => c.value,
            _others => Decimal::ZERO,
        }
    }
} // end of impl PriceQuoteModel

impl From<PriceQuoteModel> for AmountSummaryDto {
    fn from(value: PriceQuoteModel) -> Self {
        Self {
            subtotal: value.subtotal,
            discount: value.discount,
            shipping_cost: value.shipping_cost,
            tax: value.tax,
            total: value.total,
        }
    }
}
