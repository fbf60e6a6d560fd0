use super::repo_tx_mysql::downcast;
use super::util::{is_dup_key, is_fk_violation};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use std::str::FromStr;

pub struct MySqlAccountRepo {
    pool: MySqlPool,
}

impl MySqlAccountRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlAccountRepo { pool }
    }

    fn row_to_account(row: MySqlRow) -> Result<Account, AccountError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| AccountError::Store(e.to_string()))?;
        let owner: String = row
            .try_get("owner")
            .map_err(|e| AccountError::Store(e.to_string()))?;
        let balance: i64 = row
            .try_get("balance")
            .map_err(|e| AccountError::Store(e.to_string()))?;
        let currency_raw: String = row
            .try_get("currency")
            .map_err(|e| AccountError::Store(e.to_string()))?;
        let currency = Currency::from_str(&currency_raw).map_err(AccountError::Store)?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| AccountError::Store(e.to_string()))?;

        Ok(Account {
            id,
            owner,
            balance,
            currency,
            created_at,
        })
    }
}

const SELECT_ACCOUNT: &str = r#"
SELECT id, owner, balance, currency, created_at
FROM account
WHERE id = ?
"#;

#[async_trait::async_trait]
impl AccountRepo for MySqlAccountRepo {
    async fn create_account(
        &self,
        owner: &str,
        currency: Currency,
    ) -> Result<Account, AccountError> {
        let created_at = Utc::now().trunc_subsecs(0);
        let result = sqlx::query(
            r#"
INSERT INTO account (owner, balance, currency, created_at)
VALUES (?, 0, ?, ?)
"#,
        )
        .bind(owner)
        .bind(currency.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AccountError::AccountExists
            } else if is_fk_violation(&e) {
                AccountError::OwnerNotFound
            } else {
                AccountError::Store(e.to_string())
            }
        })?;

        Ok(Account {
            id: result.last_insert_id() as i64,
            owner: owner.to_string(),
            balance: 0,
            currency,
            created_at,
        })
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>, AccountError> {
        let row_opt: Option<MySqlRow> = sqlx::query(SELECT_ACCOUNT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_account).transpose()
    }

    async fn list_accounts(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, AccountError> {
        let rows = sqlx::query(
            r#"
SELECT id, owner, balance, currency, created_at
FROM account
WHERE owner = ?
ORDER BY id
LIMIT ? OFFSET ?
"#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::Store(e.to_string()))?;

        rows.into_iter().map(Self::row_to_account).collect()
    }

    async fn delete_account(&self, id: i64) -> Result<(), AccountError> {
        sqlx::query("DELETE FROM account WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        Ok(())
    }

    async fn get_account_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: i64,
    ) -> Result<Option<Account>, AccountError> {
        let tx = downcast(tx);

        // Row lock held until the surrounding transaction resolves.
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, owner, balance, currency, created_at
FROM account
WHERE id = ?
FOR UPDATE
"#,
        )
        .bind(id)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| AccountError::Store(e.to_string()))?;

        row_opt.map(Self::row_to_account).transpose()
    }

    async fn add_balance_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: i64,
        amount: i64,
    ) -> Result<Account, AccountError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE account SET balance = balance + ? WHERE id = ?")
            .bind(amount)
            .bind(id)
            .execute(tx.conn())
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        let row_opt: Option<MySqlRow> = sqlx::query(SELECT_ACCOUNT)
            .bind(id)
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        row_opt
            .map(Self::row_to_account)
            .transpose()?
            .ok_or(AccountError::AccountNotFound)
    }
}
