use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait TransferRepo: Send + Sync {
    async fn create_transfer_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
        currency: Currency,
    ) -> Result<Transfer, AccountError>;
}
