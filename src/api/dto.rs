use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constant::ProductKind;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductKindDto {
    Product,
    Service,
    Course,
    Ebook,
    Subscription,
}

impl From<ProductKindDto> for ProductKind {
    fn from(value: ProductKindDto) -> Self {
        match value {
            ProductKindDto::Product => Self::Product,
            ProductKindDto::Service => Self::Service,
            ProductKindDto::Course => Self::Course,
            ProductKindDto::Ebook => Self::Ebook,
            ProductKindDto::Subscription => Self::Subscription,
        }
    }
}
impl TryFrom<ProductKind> for ProductKindDto {
    type Error = u8;
    fn try_from(value: ProductKind) -> Result<Self, Self::Error> {
        match value {
            ProductKind::Product => Ok(Self::Product),
            ProductKind::Service => Ok(Self::Service),
            ProductKind::Course => Ok(Self::Course),
            ProductKind::Ebook => Ok(Self::Ebook),
            ProductKind::Subscription => Ok(Self::Subscription),
            ProductKind::Unknown(v) => Err(v),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillingIntervalDto {
    Month,
    Year,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecurringChargeDto {
    pub interval: BillingIntervalDto,
    pub amount: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CartLineDto {
    pub product_id: u64,
    pub kind: ProductKindDto,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub recurring: Option<RecurringChargeDto>,
    // set by the cart store on first insert, echoed back on rehydration
    #[serde(default)]
    pub added_at: Option<DateTime<FixedOffset>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CouponKindDto {
    Percentage,
    Fixed,
    FreeShipping,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CouponDto {
    pub code: String,
    pub kind: CouponKindDto,
    pub value: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethodDto {
    Standard,
    Express,
    PickUp,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ShippingSelectionDto {
    pub method: ShippingMethodDto,
    pub cost: Decimal,
    pub address: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CartDto {
    pub lines: Vec<CartLineDto>,
    pub coupon: Option<CouponDto>,
    pub shipping: ShippingSelectionDto,
}

#[derive(Serialize, Debug, Clone)]
pub struct AmountSummaryDto {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BillingInfoDto {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub identification: String,
    pub address: String,
    pub city: String,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

#[derive(Serialize, PartialEq, Debug)]
pub enum BillingFieldErrorReason {
    Empty,
    InvalidFormat,
}

#[derive(Serialize, Debug, Default)]
pub struct BillingErrorDto {
    pub full_name: Option<BillingFieldErrorReason>,
    pub email: Option<BillingFieldErrorReason>,
    pub phone: Option<BillingFieldErrorReason>,
    pub identification: Option<BillingFieldErrorReason>,
    pub address: Option<BillingFieldErrorReason>,
    pub city: Option<BillingFieldErrorReason>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethodDto {
    Card {
        number: String,
        // MM/YY
        expiry: String,
        cvv: String,
    },
    Wallet,
    BankTransfer,
    Crypto,
    QrCode,
}

#[derive(Serialize, PartialEq, Debug)]
pub enum CardFieldErrorReason {
    Empty,
    InvalidFormat,
}

#[derive(Serialize, Debug, Default)]
pub struct CardErrorDto {
    pub number: Option<CardFieldErrorReason>,
    pub expiry: Option<CardFieldErrorReason>,
    pub cvv: Option<CardFieldErrorReason>,
}

// payload of `POST /orders` to the order collaborator
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderReqDto {
    pub items: Vec<CartLineDto>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount_percent: Decimal,
    pub total: Decimal,
    pub billing: BillingInfoDto,
    pub payment_method: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderRegisteredDto {
    pub id: String,
    pub create_time: DateTime<FixedOffset>,
}

// returned to the caller once the submission sequence completes, the
// display reference is generated locally and differs from the order
// service id whenever registration is degraded to the outbox
#[derive(Serialize, Debug)]
pub struct OrderConfirmDto {
    pub display_ref: String,
    pub server_order: Option<OrderRegisteredDto>,
}
