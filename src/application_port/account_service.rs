use crate::domain_model::{Account, Currency, TransferResult};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account not found")]
    AccountNotFound,
    #[error("account already exists for this owner and currency")]
    AccountExists,
    #[error("account does not belong to the authenticated user")]
    NotOwner,
    #[error("account {account_id} currency mismatch: expected {expected}")]
    CurrencyMismatch { account_id: i64, expected: Currency },
    #[error("insufficient balance on account {account_id}")]
    InsufficientBalance { account_id: i64 },
    #[error("owner does not exist")]
    OwnerNotFound,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub currency: Currency,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Open a zero-balance account for the authenticated user.
    async fn create_account(
        &self,
        owner: &str,
        currency: Currency,
    ) -> Result<Account, AccountError>;

    /// Fetch one account; callers only see accounts they own.
    async fn get_account(&self, owner: &str, id: i64) -> Result<Account, AccountError>;

    async fn list_accounts(
        &self,
        owner: &str,
        page_id: i64,
        page_size: i64,
    ) -> Result<Vec<Account>, AccountError>;

    async fn delete_account(&self, owner: &str, id: i64) -> Result<(), AccountError>;

    /// Move money between two same-currency accounts in one transaction.
    /// The source account must belong to the authenticated user.
    async fn create_transfer(
        &self,
        owner: &str,
        request: CreateTransferInput,
    ) -> Result<TransferResult, AccountError>;
}
