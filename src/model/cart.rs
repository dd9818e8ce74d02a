use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;

use crate::api::dto::{
    BillingIntervalDto, CartDto, CartLineDto, CouponDto, CouponKindDto, ProductKindDto,
    RecurringChargeDto, ShippingMethodDto, ShippingSelectionDto,
};

use super::LineIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingInterval {
    Month,
    Year,
}

#[derive(Debug, Clone)]
pub struct RecurringChargeModel {
    pub interval: BillingInterval,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct CartLineModel {
    pub id_: LineIdentity,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub recurring: Option<RecurringChargeModel>,
    pub added_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponKind {
    Percentage,
    FixedAmount,
    FreeShipping,
}

#[derive(Debug, Clone)]
pub struct CouponModel {
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingMethod {
    Standard,
    Express,
    PickUp,
}

#[derive(Debug, Clone)]
pub struct ShippingSelectionModel {
    pub method: ShippingMethod,
    pub cost: Decimal,
    pub address: Option<String>,
}

impl Default for ShippingSelectionModel {
    fn default() -> Self {
        Self {
            method: ShippingMethod::Standard,
            cost: Decimal::ZERO,
            address: None,
        }
    }
}

// single source of truth for what one customer session intends to buy,
// mutated only through its own operations and the cart use-cases
#[derive(Debug, Clone)]
pub struct CartModel {
    pub session: String,
    pub lines: Vec<CartLineModel>,
    pub coupon: Option<CouponModel>,
    pub shipping: ShippingSelectionModel,
}

impl From<BillingIntervalDto> for BillingInterval {
    fn from(value: BillingIntervalDto) -> Self {
        match value {
            BillingIntervalDto::Month => Self::Month,
            BillingIntervalDto::Year => Self::Year,
        }
    }
}
impl From<BillingInterval> for BillingIntervalDto {
    fn from(value: BillingInterval) -> Self {
        match value {
            BillingInterval::Month => Self::Month,
            BillingInterval::Year => Self::Year,
        }
    }
}

impl From<RecurringChargeDto> for RecurringChargeModel {
    fn from(value: RecurringChargeDto) -> Self {
        Self {
            interval: value.interval.into(),
            amount: value.amount,
        }
    }
}
impl From<RecurringChargeModel> for RecurringChargeDto {
    fn from(value: RecurringChargeModel) -> Self {
        Self {
            interval: value.interval.into(),
            amount: value.amount,
        }
    }
}

impl From<CartLineDto> for CartLineModel {
    fn from(value: CartLineDto) -> Self {
        Self {
            id_: LineIdentity {
                product_id: value.product_id,
                kind: value.kind.into(),
            },
            name: value.name,
            category: value.category,
            unit_price: value.unit_price,
            quantity: value.quantity.max(1),
            recurring: value.recurring.map(RecurringChargeModel::from),
            added_at: value
                .added_at
                .unwrap_or_else(|| Local::now().fixed_offset()),
        }
    }
}
impl From<CartLineModel> for CartLineDto {
    fn from(value: CartLineModel) -> Self {
        let kind = ProductKindDto::try_from(value.id_.kind).unwrap_or(ProductKindDto::Product);
        Self {
            product_id: value.id_.product_id,
            kind,
            name: value.name,
            category: value.category,
            unit_price: value.unit_price,
            quantity: value.quantity,
            recurring: value.recurring.map(RecurringChargeDto::from),
            added_at: Some(value.added_at),
        }
    }
}

impl From<CouponKindDto> for CouponKind {
    fn from(value: CouponKindDto) -> Self {
        match value {
            CouponKindDto::Percentage => Self::Percentage,
            CouponKindDto::Fixed => Self::FixedAmount,
            CouponKindDto::FreeShipping => Self::FreeShipping,
        }
    }
}
impl From<CouponKind> for CouponKindDto {
    fn from(value: CouponKind) -> Self {
        match value {
            CouponKind::Percentage => Self::Percentage,
            CouponKind::FixedAmount => Self::Fixed,
            CouponKind::FreeShipping => Self::FreeShipping,
        }
    }
}

impl From<CouponDto> for CouponModel {
    fn from(value: CouponDto) -> Self {
        Self {
            code: value.code,
            kind: value.kind.into(),
            value: value.value,
        }
    }
}
impl From<CouponModel> for CouponDto {
    fn from(value: CouponModel) -> Self {
        Self {
            code: value.code,
            kind: value.kind.into(),
            value: value.value,
        }
    }
}

impl From<ShippingSelectionDto> for ShippingSelectionModel {
    fn from(value: ShippingSelectionDto) -> Self {
        let method = match value.method {
            ShippingMethodDto::Standard => ShippingMethod::Standard,
            ShippingMethodDto::Express => ShippingMethod::Express,
            ShippingMethodDto::PickUp => ShippingMethod::PickUp,
        };
        Self {
            method,
            cost: value.cost,
            address: value.address,
        }
    }
}
impl From<ShippingSelectionModel> for ShippingSelectionDto {
    fn from(value: ShippingSelectionModel) -> Self {
        let method = match value.method {
            ShippingMethod::Standard => ShippingMethodDto::Standard,
            ShippingMethod::Express => ShippingMethodDto::Express,
            ShippingMethod::PickUp => ShippingMethodDto::PickUp,
        };
        Self {
            method,
            cost: value.cost,
            address: value.address,
        }
    }
}

impl From<CartModel> for CartDto {
    fn from(value: CartModel) -> Self {
        Self {
            lines: value
                .lines
                .into_iter()
                .map(CartLineDto::from)
                .collect::<Vec<_>>(),
            coupon: value.coupon.map(CouponDto::from),
            shipping: value.shipping.into(),
        }
    }
}

impl From<(String, CartDto)> for CartModel {
    fn from(value: (String, CartDto)) -> Self {
        let (session, data) = value;
        Self {
            session,
            lines: data
                .lines
                .into_iter()
                .map(CartLineModel::from)
                .collect::<Vec<_>>(),
            coupon: data.coupon.map(CouponModel::from),
            shipping: data.shipping.into(),
        }
    }
}

impl CartModel {
    pub fn new(session: String) -> Self {
        Self {
            session,
            lines: Vec::new(),
            coupon: None,
            shipping: ShippingSelectionModel::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    // a repeated add with the same `(product-id, kind)` pair increments
    // the saved quantity instead of duplicating the line
    pub fn add_line(&mut self, data: CartLineDto) {
        let qty_add = data.quantity.max(1);
        if let Some(saved) = self.get_line_mut(&LineIdentity {
            product_id: data.product_id,
            kind: data.kind.into(),
        }) {
            saved.quantity += qty_add;
        } else {
            let mut line = CartLineModel::from(data);
            line.quantity = qty_add;
            self.lines.push(line);
        }
    }

    pub fn remove_line(&mut self, id_: &LineIdentity) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id_ != id_);
        self.lines.len() < before
    }

    // zero quantity is equivalent to removing the line, the cart never
    // keeps a line whose quantity reached the floor
    pub fn set_quantity(&mut self, id_: &LineIdentity, qty: u32) -> bool {
        if qty == 0 {
            self.remove_line(id_)
        } else if let Some(saved) = self.get_line_mut(id_) {
            saved.quantity = qty;
            true
        } else {
            false
        }
    }

    // a known coupon always replaces the previous one, re-applying the
    // same code converges to the same state
    pub fn apply_coupon(&mut self, c: CouponModel) {
        self.coupon = Some(c);
    }

    pub fn remove_coupon(&mut self) -> Option<CouponModel> {
        self.coupon.take()
    }

    pub fn select_shipping(&mut self, s: ShippingSelectionModel) {
        self.shipping = s;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
        self.shipping = ShippingSelectionModel::default();
    }

    pub fn subscription_plan_ids(&self) -> Vec<u64> {
        self.lines
            .iter()
            .filter(|line| {
                matches!(line.id_.kind, crate::constant::ProductKind::Subscription)
            })
            .map(|line| line.id_.product_id)
            .collect::<Vec<_>>()
    }

    fn get_line_mut(&mut self, id_: &LineIdentity) -> Option<&mut CartLineModel> {
        self.lines.iter_mut().find(|line| &line.id_ == id_)
    }
} // end of impl CartModel
