use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use storefront_checkout::api::dto::{OrderReqDto, ProductKindDto};
use storefront_checkout::model::{OutboxTaskKind, OutboxTaskModel};
use storefront_checkout::repository::{app_repo_outbox, AbsOutboxRepo};

use crate::model::{ut_default_cart_line, ut_valid_billing_dto};
use crate::ut_setup_share_state;

fn ut_order_req() -> OrderReqDto {
    OrderReqDto {
        items: vec![ut_default_cart_line(42, ProductKindDto::Product, "25.00", 1)],
        subtotal: "25.00".parse::<Decimal>().unwrap(),
        tax: "3.00".parse::<Decimal>().unwrap(),
        discount_percent: Decimal::ZERO,
        total: "28.00".parse::<Decimal>().unwrap(),
        billing: ut_valid_billing_dto(),
        payment_method: "wallet".to_string(),
    }
}

#[tokio::test]
async fn save_fetch_both_kinds() {
    let shr_state = ut_setup_share_state("config_ok.json");
    let repo = app_repo_outbox(shr_state.datastore()).await.unwrap();
    let ctime = DateTime::parse_from_rfc3339("2024-05-20T09:15:32+02:00").unwrap();
    let task0 = OutboxTaskModel {
        task_id: "outbox-ut-0001".to_string(),
        kind: OutboxTaskKind::SubscriptionActivate { plan_id: 305 },
        attempts: 2,
        last_error: "network-unavailable".to_string(),
        create_time: ctime,
    };
    let task1 = OutboxTaskModel {
        task_id: "outbox-ut-0002".to_string(),
        kind: OutboxTaskKind::OrderRegister {
            payload: ut_order_req(),
        },
        attempts: 3,
        last_error: "network-unavailable".to_string(),
        create_time: Local::now().fixed_offset(),
    };
    repo.save(task0).await.unwrap();
    repo.save(task1).await.unwrap();
    let mut fetched = repo.fetch_all().await.unwrap();
    fetched.sort_by(|a, b| a.task_id.cmp(&b.task_id));
    assert_eq!(fetched.len(), 2);
    match &fetched[0].kind {
        OutboxTaskKind::SubscriptionActivate { plan_id } => {
            assert_eq!(*plan_id, 305u64);
        }
        _others => panic!("unexpected task kind"),
    }
    assert_eq!(fetched[0].attempts, 2u32);
    assert_eq!(fetched[0].create_time, ctime);
    match &fetched[1].kind {
        OutboxTaskKind::OrderRegister { payload } => {
            assert_eq!(payload.items.len(), 1);
            assert_eq!(payload.total, "28.00".parse::<Decimal>().unwrap());
            assert_eq!(payload.payment_method.as_str(), "wallet");
        }
        _others => panic!("unexpected task kind"),
    }
}
