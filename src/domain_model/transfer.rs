use super::{Account, Currency};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

/// A committed transfer together with both post-transfer account states.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
}
