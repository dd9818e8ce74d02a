mod coupon;
mod outbox;
