use rust_decimal::Decimal;

use storefront_checkout::model::CouponKind;
use storefront_checkout::repository::{app_repo_coupon, AbsCouponRepo};
use storefront_checkout::{AppCouponCfg, AppCouponKindCfg};

fn ut_coupon_cfg() -> Vec<AppCouponCfg> {
    vec![
        AppCouponCfg {
            code: "WELCOME10".to_string(),
            kind: AppCouponKindCfg::Percentage,
            value: Decimal::from(10u32),
        },
        AppCouponCfg {
            code: " freeship ".to_string(),
            kind: AppCouponKindCfg::FreeShipping,
            value: Decimal::ZERO,
        },
    ]
}

#[tokio::test]
async fn lookup_case_insensitive() {
    let repo = app_repo_coupon(&ut_coupon_cfg());
    let found = repo.fetch_by_code("welcome10").await.unwrap();
    let c = found.unwrap();
    assert_eq!(c.code.as_str(), "WELCOME10");
    assert_eq!(c.kind, CouponKind::Percentage);
    assert_eq!(c.value, Decimal::from(10u32));
    // seeded codes are normalized the same way as the lookups
    let found = repo.fetch_by_code("FreeShip").await.unwrap();
    assert_eq!(found.unwrap().kind, CouponKind::FreeShipping);
}

#[tokio::test]
async fn lookup_unknown_code() {
    let repo = app_repo_coupon(&ut_coupon_cfg());
    let found = repo.fetch_by_code("TOTALLY-BOGUS").await.unwrap();
    assert!(found.is_none());
    let found = repo.fetch_by_code("  ").await.unwrap();
    assert!(found.is_none());
}
