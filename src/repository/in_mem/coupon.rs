use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;

use crate::config::{AppCouponCfg, AppCouponKindCfg};
use crate::error::AppError;
use crate::model::{CouponKind, CouponModel};
use crate::repository::AbsCouponRepo;

// the storefront publishes a small fixed set of promo codes, they are
// seeded from the service config instead of a table in the datastore
pub struct CouponInMemRepo {
    entries: HashMap<String, CouponModel>,
}

impl CouponInMemRepo {
    pub fn build(cfg: &[AppCouponCfg]) -> Self {
        let iter = cfg.iter().map(|c| {
            let kind = match c.kind {
                AppCouponKindCfg::Percentage => CouponKind::Percentage,
                AppCouponKindCfg::Fixed => CouponKind::FixedAmount,
                AppCouponKindCfg::FreeShipping => CouponKind::FreeShipping,
            };
            let m = CouponModel {
                code: Self::normalize(c.code.as_str()),
                kind,
                value: c.value,
            };
            (m.code.clone(), m)
        });
        Self {
            entries: HashMap::from_iter(iter),
        }
    }

    // codes are matched case-insensitively, customers type them in
    fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }
}

#[async_trait]
impl AbsCouponRepo for CouponInMemRepo {
    async fn fetch_by_code(&self, code: &str) -> DefaultResult<Option<CouponModel>, AppError> {
        let found = self.entries.get(Self::normalize(code).as_str()).cloned();
        Ok(found)
    }
}
