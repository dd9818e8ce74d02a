use rust_decimal::Decimal;

use storefront_checkout::api::dto::ProductKindDto;
use storefront_checkout::constant::ProductKind;
use storefront_checkout::model::{
    CartModel, CouponKind, CouponModel, LineIdentity, ShippingMethod, ShippingSelectionModel,
};

use super::ut_default_cart_line;

#[test]
fn add_line_merge_same_identity() {
    let mut cart = CartModel::new("sess-cart-merge".to_string());
    cart.add_line(ut_default_cart_line(140, ProductKindDto::Product, "19.99", 2));
    cart.add_line(ut_default_cart_line(140, ProductKindDto::Product, "19.99", 3));
    assert_eq!(cart.num_lines(), 1);
    assert_eq!(cart.lines[0].quantity, 5u32);
    // same product id with different kind is a distinct line
    cart.add_line(ut_default_cart_line(140, ProductKindDto::Ebook, "6.50", 1));
    assert_eq!(cart.num_lines(), 2);
}

#[test]
fn add_line_quantity_floor() {
    let mut cart = CartModel::new("sess-cart-floor".to_string());
    cart.add_line(ut_default_cart_line(77, ProductKindDto::Service, "4.00", 0));
    assert_eq!(cart.num_lines(), 1);
    assert_eq!(cart.lines[0].quantity, 1u32);
}

#[test]
fn remove_line_miss() {
    let mut cart = CartModel::new("sess-cart-rm".to_string());
    cart.add_line(ut_default_cart_line(18, ProductKindDto::Course, "29.00", 1));
    let unknown = LineIdentity {
        product_id: 9999,
        kind: ProductKind::Course,
    };
    assert!(!cart.remove_line(&unknown));
    assert_eq!(cart.num_lines(), 1);
    let known = LineIdentity {
        product_id: 18,
        kind: ProductKind::Course,
    };
    assert!(cart.remove_line(&known));
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_zero_removes() {
    let mut cart = CartModel::new("sess-cart-qty".to_string());
    cart.add_line(ut_default_cart_line(52, ProductKindDto::Product, "8.75", 4));
    let id_ = LineIdentity {
        product_id: 52,
        kind: ProductKind::Product,
    };
    assert!(cart.set_quantity(&id_, 9));
    assert_eq!(cart.lines[0].quantity, 9u32);
    assert!(cart.set_quantity(&id_, 0));
    assert!(cart.is_empty());
    assert!(!cart.set_quantity(&id_, 3));
}

#[test]
fn coupon_replace_and_remove() {
    let mut cart = CartModel::new("sess-cart-coupon".to_string());
    cart.apply_coupon(CouponModel {
        code: "WELCOME10".to_string(),
        kind: CouponKind::Percentage,
        value: Decimal::from(10u32),
    });
    cart.apply_coupon(CouponModel {
        code: "SAVE5".to_string(),
        kind: CouponKind::FixedAmount,
        value: Decimal::from(5u32),
    });
    assert_eq!(cart.coupon.as_ref().unwrap().code.as_str(), "SAVE5");
    let prev = cart.remove_coupon();
    assert!(prev.is_some());
    assert!(cart.coupon.is_none());
    assert!(cart.remove_coupon().is_none());
}

#[test]
fn clear_resets_all() {
    let mut cart = CartModel::new("sess-cart-clear".to_string());
    cart.add_line(ut_default_cart_line(3, ProductKindDto::Ebook, "12.00", 1));
    cart.apply_coupon(CouponModel {
        code: "FREESHIP".to_string(),
        kind: CouponKind::FreeShipping,
        value: Decimal::ZERO,
    });
    cart.select_shipping(ShippingSelectionModel {
        method: ShippingMethod::Express,
        cost: "7.50".parse::<Decimal>().unwrap(),
        address: Some("somewhere".to_string()),
    });
    cart.clear();
    assert!(cart.is_empty());
    assert!(cart.coupon.is_none());
    assert_eq!(cart.shipping.method, ShippingMethod::Standard);
    assert_eq!(cart.shipping.cost, Decimal::ZERO);
}

#[test]
fn subscription_plan_ids_filter() {
    let mut cart = CartModel::new("sess-cart-subs".to_string());
    cart.add_line(ut_default_cart_line(21, ProductKindDto::Product, "10.00", 1));
    cart.add_line(ut_default_cart_line(305, ProductKindDto::Subscription, "9.99", 1));
    cart.add_line(ut_default_cart_line(306, ProductKindDto::Subscription, "4.99", 1));
    let mut plan_ids = cart.subscription_plan_ids();
    plan_ids.sort();
    assert_eq!(plan_ids, vec![305u64, 306]);
}
