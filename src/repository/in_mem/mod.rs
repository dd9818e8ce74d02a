pub(super) mod cart;
pub(super) mod coupon;
pub(super) mod outbox;
