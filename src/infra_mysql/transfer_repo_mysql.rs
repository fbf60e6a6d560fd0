use super::repo_tx_mysql::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{SubsecRound, Utc};

pub struct MySqlTransferRepo;

impl MySqlTransferRepo {
    pub fn new() -> Self {
        MySqlTransferRepo
    }
}

impl Default for MySqlTransferRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransferRepo for MySqlTransferRepo {
    async fn create_transfer_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
        currency: Currency,
    ) -> Result<Transfer, AccountError> {
        let tx = downcast(tx);
        let created_at = Utc::now().trunc_subsecs(0);

        let result = sqlx::query(
            r#"
INSERT INTO transfer (from_account_id, to_account_id, amount, currency, created_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(from_account_id)
        .bind(to_account_id)
        .bind(amount)
        .bind(currency.as_str())
        .bind(created_at)
        .execute(tx.conn())
        .await
        .map_err(|e| AccountError::Store(e.to_string()))?;

        Ok(Transfer {
            id: result.last_insert_id() as i64,
            from_account_id,
            to_account_id,
            amount,
            currency,
            created_at,
        })
    }
}
