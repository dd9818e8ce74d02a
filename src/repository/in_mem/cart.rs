use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use rust_decimal::Decimal;

use crate::api::dto::{CartDto, CouponDto, RecurringChargeDto, ShippingSelectionDto};
use crate::constant::ProductKind;
use tokio::sync::OwnedMutexGuard;

use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow,
    AppInMemFetchedSingleTable, AppLocalFsSlotStore, AppSessionLockRegistry,
};
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{CartLineModel, CartModel, CouponModel, LineIdentity, ShippingSelectionModel};
use crate::repository::AbsCartRepo;

fn corrupt_err(detail: String) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(detail),
    }
}

#[allow(non_snake_case)]
mod CartTopTable {
    use super::{AppInMemFetchedSingleRow, AppInMemFetchedSingleTable, CartModel, HashMap};

    pub(super) const LABEL: &str = "cart_toplvl";
    pub(super) struct UpdateArg<'a>(pub(super) &'a CartModel);

    impl<'a> From<UpdateArg<'a>> for AppInMemFetchedSingleRow {
        fn from(value: UpdateArg<'a>) -> Self {
            let obj = value.0;
            let coupon_seri = obj
                .coupon
                .clone()
                .map(|c| {
                    let d = super::CouponDto::from(c);
                    serde_json::to_string(&d).unwrap_or_default()
                })
                .unwrap_or_default();
            let ship_d = super::ShippingSelectionDto::from(obj.shipping.clone());
            let ship_seri = serde_json::to_string(&ship_d).unwrap_or_default();
            vec![coupon_seri, ship_seri]
        }
    }
    impl<'a> From<UpdateArg<'a>> for AppInMemFetchedSingleTable {
        fn from(value: UpdateArg<'a>) -> Self {
            let key = value.0.session.clone();
            let row = value.into();
            HashMap::from([(key, row)])
        }
    }
} // end of inner-mod CartTopTable

#[allow(non_snake_case)]
mod CartLineTable {
    use super::{AppInMemFetchedSingleTable, CartModel, HashMap, LineIdentity};

    pub(super) const LABEL: &str = "cart_line";
    pub(super) struct UpdateArg<'a>(pub(super) &'a CartModel);

    // session ids are opaque but must not contain the separator
    pub(super) fn pkey(session: &str, id_: &LineIdentity) -> String {
        let kind_num: u8 = id_.kind.clone().into();
        format!("{}/{}/{}", session, id_.product_id, kind_num)
    }

    impl<'a> From<UpdateArg<'a>> for AppInMemFetchedSingleTable {
        fn from(value: UpdateArg<'a>) -> Self {
            let (session, lines) = (value.0.session.as_str(), &value.0.lines);
            let iter0 = lines.iter().map(|line| {
                let key = pkey(session, &line.id_);
                let recur_seri = line
                    .recurring
                    .clone()
                    .map(|r| {
                        let d = super::RecurringChargeDto::from(r);
                        serde_json::to_string(&d).unwrap_or_default()
                    })
                    .unwrap_or_default();
                let row = vec![
                    line.name.clone(),
                    line.category.clone(),
                    line.unit_price.to_string(),
                    line.quantity.to_string(),
                    recur_seri,
                    line.added_at.to_rfc3339(),
                ];
                (key, row)
            });
            HashMap::from_iter(iter0)
        }
    }
} // end of inner-mod CartLineTable

struct InnerFilterKeyOp {
    session: String,
    line_key_layout: bool,
}
impl AbsDStoreFilterKeyOp for InnerFilterKeyOp {
    fn filter(&self, k: &String, _v: &Vec<String>) -> bool {
        if self.line_key_layout {
            let mut tokens = k.rsplitn(3, '/');
            let (_kind, _pid) = (tokens.next(), tokens.next());
            tokens.next() == Some(self.session.as_str())
        } else {
            k.as_str() == self.session.as_str()
        }
    }
}

impl TryFrom<(String, Vec<String>)> for CartLineModel {
    type Error = AppError;
    fn try_from(value: (String, Vec<String>)) -> DefaultResult<Self, Self::Error> {
        let (key, mut row) = (value.0, value.1);
        if row.len() != 6 {
            return Err(corrupt_err(format!("cart-line-row-len:{}", row.len())));
        }
        let mut tokens = key.rsplitn(3, '/');
        let kind = tokens
            .next()
            .map(ProductKind::from_str)
            .ok_or_else(|| corrupt_err(format!("cart-line-key:{key}")))??;
        let product_id = tokens
            .next()
            .and_then(|t| t.parse::<u64>().ok())
            .ok_or_else(|| corrupt_err(format!("cart-line-key:{key}")))?;
        let added_at = DateTime::parse_from_rfc3339(row.remove(5).as_str())
            .map_err(|e| corrupt_err(format!("cart-line-added-at:{e}")))?;
        let recur_seri = row.remove(4);
        let recurring = if recur_seri.is_empty() {
            None
        } else {
            let d = serde_json::from_str::<RecurringChargeDto>(recur_seri.as_str())?;
            Some(d.into())
        };
        let quantity = row
            .remove(3)
            .parse::<u32>()
            .map_err(|e| corrupt_err(format!("cart-line-qty:{e}")))?;
        let unit_price = Decimal::from_str(row.remove(2).as_str())
            .map_err(|e| corrupt_err(format!("cart-line-price:{e}")))?;
        let out = CartLineModel {
            id_: LineIdentity { product_id, kind },
            category: row.remove(1),
            name: row.remove(0),
            unit_price,
            quantity,
            recurring,
            added_at,
        };
        Ok(out)
    } // end of fn try_from
}

impl TryFrom<(String, Vec<String>, Vec<CartLineModel>)> for CartModel {
    type Error = AppError;
    fn try_from(
        value: (String, Vec<String>, Vec<CartLineModel>),
    ) -> DefaultResult<Self, Self::Error> {
        let (session, mut row, lines) = (value.0, value.1, value.2);
        if row.len() != 2 {
            return Err(corrupt_err(format!("cart-toplvl-row-len:{}", row.len())));
        }
        let ship_d = serde_json::from_str::<ShippingSelectionDto>(row.remove(1).as_str())?;
        let coupon_seri = row.remove(0);
        let coupon = if coupon_seri.is_empty() {
            None
        } else {
            let d = serde_json::from_str::<CouponDto>(coupon_seri.as_str())?;
            Some(CouponModel::from(d))
        };
        Ok(CartModel {
            session,
            lines,
            coupon,
            shipping: ShippingSelectionModel::from(ship_d),
        })
    }
}

pub struct CartInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
    slot: Option<Arc<AppLocalFsSlotStore>>,
    sess_locks: Arc<AppSessionLockRegistry>,
    log_ctx: Arc<AppLogContext>,
}

#[async_trait]
impl AbsCartRepo for CartInMemRepo {
    async fn lock_session(
        &self,
        session: &str,
    ) -> DefaultResult<OwnedMutexGuard<()>, AppError> {
        self.sess_locks.acquire(session).await
    }

    async fn update(&self, obj: CartModel) -> DefaultResult<usize, AppError> {
        // stale line keys from removed items have to go away first
        let stale = self.filter_keys(obj.session.as_str()).await?;
        let _num_purged = self.datastore.delete(stale).await?;
        let rows0 = CartTopTable::UpdateArg(&obj).into();
        let rows1 = CartLineTable::UpdateArg(&obj).into();
        let data = HashMap::from([
            (CartTopTable::LABEL.to_string(), rows0),
            (CartLineTable::LABEL.to_string(), rows1),
        ]);
        let num_saved = self.datastore.save(data).await?;
        self.persist_slot(&obj)?;
        Ok(num_saved)
    }

    async fn discard(&self, session: &str) -> DefaultResult<(), AppError> {
        let info = self.filter_keys(session).await?;
        let _num_affected = self.datastore.delete(info).await?;
        if let Some(slot) = self.slot.as_ref() {
            slot.remove_slot(Self::slot_key(session).as_str())?;
        }
        Ok(())
    }

    async fn fetch_cart(&self, session: &str) -> DefaultResult<CartModel, AppError> {
        let info = self.filter_keys(session).await?;
        let mut result = self.datastore.fetch(info).await?;
        let (rows_toplvl, rows_lines) = (
            result.remove(CartTopTable::LABEL).unwrap_or_default(),
            result.remove(CartLineTable::LABEL).unwrap_or_default(),
        );
        if rows_toplvl.is_empty() {
            // nothing in working memory yet, rehydrate from the
            // durable slot, corruption fails open to an empty cart
            return self.rehydrate(session).await;
        }
        let mut errors = Vec::new();
        let mut m_lines = rows_lines
            .into_iter()
            .filter_map(|(k, v)| match CartLineModel::try_from((k, v)) {
                Ok(m) => Some(m),
                Err(e) => {
                    errors.push(e);
                    None
                }
            })
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        // table rows come back in hash order, display order follows the
        // time each line entered the cart
        m_lines.sort_by(|a, b| {
            a.added_at
                .cmp(&b.added_at)
                .then_with(|| a.id_.product_id.cmp(&b.id_.product_id))
        });
        let (_key, row) = rows_toplvl.into_iter().next().unwrap_or_default();
        CartModel::try_from((session.to_string(), row, m_lines))
    } // end of fn fetch_cart
} // end of impl AbsCartRepo for CartInMemRepo

impl CartInMemRepo {
    pub async fn new(
        m: Arc<Box<dyn AbstInMemoryDStore>>,
        slot: Option<Arc<AppLocalFsSlotStore>>,
        sess_locks: Arc<AppSessionLockRegistry>,
        log_ctx: Arc<AppLogContext>,
    ) -> DefaultResult<Self, AppError> {
        m.create_table(CartTopTable::LABEL).await?;
        m.create_table(CartLineTable::LABEL).await?;
        Ok(Self {
            datastore: m,
            slot,
            sess_locks,
            log_ctx,
        })
    }

    fn slot_key(session: &str) -> String {
        format!("cart-{session}")
    }

    async fn filter_keys(&self, session: &str) -> DefaultResult<AppInMemFetchKeys, AppError> {
        let mut op = InnerFilterKeyOp {
            session: session.to_string(),
            line_key_layout: true,
        };
        let mut key_set = Vec::new();

        let tbl_name = CartLineTable::LABEL.to_string();
        let keys = self.datastore.filter_keys(tbl_name.clone(), &op).await?;
        key_set.push((tbl_name, keys));

        op.line_key_layout = false;
        let tbl_name = CartTopTable::LABEL.to_string();
        let keys = self.datastore.filter_keys(tbl_name.clone(), &op).await?;
        key_set.push((tbl_name, keys));
        Ok(HashMap::from_iter(key_set))
    }

    fn persist_slot(&self, obj: &CartModel) -> DefaultResult<(), AppError> {
        if let Some(slot) = self.slot.as_ref() {
            let d = CartDto::from(obj.clone());
            let raw = serde_json::to_string(&d)?;
            slot.write_slot(Self::slot_key(obj.session.as_str()).as_str(), raw)?;
        }
        Ok(())
    }

    async fn rehydrate(&self, session: &str) -> DefaultResult<CartModel, AppError> {
        let raw_found = match self.slot.as_ref() {
            Some(slot) => match slot.read_slot(Self::slot_key(session).as_str()) {
                Ok(v) => v,
                Err(e) => {
                    let logctx = &self.log_ctx;
                    app_log_event!(
                        logctx,
                        AppLogLevel::WARNING,
                        "cart-slot-unreadable, session:{}, {}",
                        session,
                        e
                    );
                    None
                }
            },
            None => None,
        };
        let obj = match raw_found {
            Some(raw) => match serde_json::from_str::<CartDto>(raw.as_str()) {
                Ok(d) => CartModel::from((session.to_string(), d)),
                Err(e) => {
                    let logctx = &self.log_ctx;
                    app_log_event!(
                        logctx,
                        AppLogLevel::WARNING,
                        "cart-slot-corrupt, session:{}, {}",
                        session,
                        e
                    );
                    CartModel::new(session.to_string())
                }
            },
            None => CartModel::new(session.to_string()),
        };
        if !obj.is_empty() {
            // keep the working copy in memory for subsequent fetches
            let rows0 = CartTopTable::UpdateArg(&obj).into();
            let rows1 = CartLineTable::UpdateArg(&obj).into();
            let data = HashMap::from([
                (CartTopTable::LABEL.to_string(), rows0),
                (CartLineTable::LABEL.to_string(), rows1),
            ]);
            let _num = self.datastore.save(data).await?;
        }
        Ok(obj)
    } // end of fn rehydrate
} // end of impl CartInMemRepo
