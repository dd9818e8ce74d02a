use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;

use crate::api::dto::OrderReqDto;
use crate::datastore::{AbsDStoreFilterKeyOp, AbstInMemoryDStore};
use crate::error::{AppError, AppErrorCode};
use crate::model::{OutboxTaskKind, OutboxTaskModel};
use crate::repository::AbsOutboxRepo;

const TABLE_LABEL: &str = "sideeffect_outbox";

struct AcceptAllKeyOp;
impl AbsDStoreFilterKeyOp for AcceptAllKeyOp {
    fn filter(&self, _k: &String, _v: &Vec<String>) -> bool {
        true
    }
}

impl From<&OutboxTaskModel> for Vec<String> {
    fn from(value: &OutboxTaskModel) -> Self {
        let payload = match &value.kind {
            OutboxTaskKind::SubscriptionActivate { plan_id } => plan_id.to_string(),
            OutboxTaskKind::OrderRegister { payload } => {
                serde_json::to_string(payload).unwrap_or_default()
            }
        };
        vec![
            value.kind.label().to_string(),
            payload,
            value.attempts.to_string(),
            value.last_error.clone(),
            value.create_time.to_rfc3339(),
        ]
    }
}

impl TryFrom<(String, Vec<String>)> for OutboxTaskModel {
    type Error = AppError;
    fn try_from(value: (String, Vec<String>)) -> DefaultResult<Self, Self::Error> {
        let (task_id, mut row) = (value.0, value.1);
        let corrupt = |detail: String| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(detail),
        };
        if row.len() != 5 {
            return Err(corrupt(format!("outbox-row-len:{}", row.len())));
        }
        let create_time = DateTime::parse_from_rfc3339(row.remove(4).as_str())
            .map_err(|e| corrupt(format!("outbox-ctime:{e}")))?;
        let last_error = row.remove(3);
        let attempts = row
            .remove(2)
            .parse::<u32>()
            .map_err(|e| corrupt(format!("outbox-attempts:{e}")))?;
        let payload = row.remove(1);
        let kind = match row.remove(0).as_str() {
            "subscription-activate" => OutboxTaskKind::SubscriptionActivate {
                plan_id: payload
                    .parse::<u64>()
                    .map_err(|e| corrupt(format!("outbox-plan-id:{e}")))?,
            },
            "order-register" => OutboxTaskKind::OrderRegister {
                payload: serde_json::from_str::<OrderReqDto>(payload.as_str())?,
            },
            _others => {
                return Err(corrupt(format!("outbox-kind:{_others}")));
            }
        };
        Ok(Self {
            task_id,
            kind,
            attempts,
            last_error,
            create_time,
        })
    } // end of fn try_from
}

pub struct OutboxInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

#[async_trait]
impl AbsOutboxRepo for OutboxInMemRepo {
    async fn save(&self, task: OutboxTaskModel) -> DefaultResult<(), AppError> {
        let row: Vec<String> = (&task).into();
        let rows = HashMap::from([(task.task_id.clone(), row)]);
        let data = HashMap::from([(TABLE_LABEL.to_string(), rows)]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<OutboxTaskModel>, AppError> {
        let op = AcceptAllKeyOp;
        let keys = self
            .datastore
            .filter_keys(TABLE_LABEL.to_string(), &op)
            .await?;
        let info = HashMap::from([(TABLE_LABEL.to_string(), keys)]);
        let mut result = self.datastore.fetch(info).await?;
        let rows = result.remove(TABLE_LABEL).unwrap_or_default();
        let mut out = Vec::new();
        for (k, v) in rows {
            out.push(OutboxTaskModel::try_from((k, v))?);
        }
        Ok(out)
    }
} // end of impl OutboxInMemRepo

impl OutboxInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }
}
