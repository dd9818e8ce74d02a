use rust_decimal::Decimal;

use storefront_checkout::api::dto::ProductKindDto;
use storefront_checkout::model::{
    CartModel, CouponKind, CouponModel, PriceQuoteModel, ShippingMethod, ShippingSelectionModel,
};

use super::ut_default_cart_line;

fn amount(raw: &str) -> Decimal {
    raw.parse::<Decimal>().unwrap()
}

#[test]
fn tax_rounds_half_up() {
    let mut cart = CartModel::new("sess-price-tax".to_string());
    cart.add_line(ut_default_cart_line(11, ProductKindDto::Product, "19.99", 1));
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.subtotal, amount("19.99"));
    // 19.99 * 0.12 = 2.3988, presented as 2.40
    assert_eq!(quote.tax, amount("2.40"));
    // total composed from unrounded terms, 22.3888 presented as 22.39
    assert_eq!(quote.total, amount("22.39"));
}

#[test]
fn percentage_coupon_discount() {
    let mut cart = CartModel::new("sess-price-pct".to_string());
    cart.add_line(ut_default_cart_line(12, ProductKindDto::Product, "50.00", 2));
    cart.apply_coupon(CouponModel {
        code: "WELCOME10".to_string(),
        kind: CouponKind::Percentage,
        value: Decimal::from(10u32),
    });
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.subtotal, amount("100.00"));
    assert_eq!(quote.discount, amount("10.00"));
    assert_eq!(quote.tax, amount("12.00"));
    assert_eq!(quote.total, amount("102.00"));
    assert_eq!(PriceQuoteModel::discount_percent(&cart), Decimal::from(10u32));
}

#[test]
fn fixed_coupon_caps_at_subtotal() {
    let mut cart = CartModel::new("sess-price-fixed".to_string());
    cart.add_line(ut_default_cart_line(13, ProductKindDto::Ebook, "4.00", 1));
    cart.apply_coupon(CouponModel {
        code: "SAVE5".to_string(),
        kind: CouponKind::FixedAmount,
        value: Decimal::from(5u32),
    });
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.discount, amount("4.00"));
    assert_eq!(quote.total, amount("0.48"));
    assert_eq!(PriceQuoteModel::discount_percent(&cart), Decimal::ZERO);
}

#[test]
fn free_shipping_overrides_cost() {
    let mut cart = CartModel::new("sess-price-ship".to_string());
    cart.add_line(ut_default_cart_line(14, ProductKindDto::Product, "30.00", 1));
    cart.select_shipping(ShippingSelectionModel {
        method: ShippingMethod::Express,
        cost: amount("7.50"),
        address: None,
    });
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.shipping_cost, amount("7.50"));
    assert_eq!(quote.total, amount("41.10"));

    cart.apply_coupon(CouponModel {
        code: "FREESHIP".to_string(),
        kind: CouponKind::FreeShipping,
        value: Decimal::ZERO,
    });
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.shipping_cost, Decimal::ZERO);
    assert_eq!(quote.discount, amount("0.00"));
    assert_eq!(quote.total, amount("33.60"));
}

#[test]
fn empty_cart_all_zero() {
    let cart = CartModel::new("sess-price-empty".to_string());
    let quote = PriceQuoteModel::evaluate(&cart, 12u8);
    assert_eq!(quote.subtotal, Decimal::ZERO);
    assert_eq!(quote.tax, amount("0.00"));
    assert_eq!(quote.total, amount("0.00"));
}
