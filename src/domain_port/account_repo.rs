use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait AccountRepo: Send + Sync {
    async fn create_account(
        &self,
        owner: &str,
        currency: Currency,
    ) -> Result<Account, AccountError>;

    async fn get_account(&self, id: i64) -> Result<Option<Account>, AccountError>;

    /// Page of accounts owned by `owner`, ordered by id.
    async fn list_accounts(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, AccountError>;

    async fn delete_account(&self, id: i64) -> Result<(), AccountError>;

    async fn get_account_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: i64,
    ) -> Result<Option<Account>, AccountError>;

    /// Atomically add `amount` (may be negative) to the balance and return
    /// the updated row.
    async fn add_balance_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: i64,
        amount: i64,
    ) -> Result<Account, AccountError>;
}
