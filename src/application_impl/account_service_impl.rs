use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{AccountRepo, TransferRepo, TxManager};
use std::sync::Arc;

pub struct RealAccountService {
    account_repo: Arc<dyn AccountRepo>,
    transfer_repo: Arc<dyn TransferRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealAccountService {
    pub fn new(
        account_repo: Arc<dyn AccountRepo>,
        transfer_repo: Arc<dyn TransferRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            account_repo,
            transfer_repo,
            tx_manager,
        }
    }
}

#[async_trait::async_trait]
impl AccountService for RealAccountService {
    async fn create_account(
        &self,
        owner: &str,
        currency: Currency,
    ) -> Result<Account, AccountError> {
        self.account_repo.create_account(owner, currency).await
    }

    async fn get_account(&self, owner: &str, id: i64) -> Result<Account, AccountError> {
        let account = self
            .account_repo
            .get_account(id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if account.owner != owner {
            return Err(AccountError::NotOwner);
        }
        Ok(account)
    }

    async fn list_accounts(
        &self,
        owner: &str,
        page_id: i64,
        page_size: i64,
    ) -> Result<Vec<Account>, AccountError> {
        let offset = (page_id - 1) * page_size;
        self.account_repo
            .list_accounts(owner, page_size, offset)
            .await
    }

    async fn delete_account(&self, owner: &str, id: i64) -> Result<(), AccountError> {
        let account = self
            .account_repo
            .get_account(id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if account.owner != owner {
            return Err(AccountError::NotOwner);
        }
        self.account_repo.delete_account(id).await
    }

    async fn create_transfer(
        &self,
        owner: &str,
        request: CreateTransferInput,
    ) -> Result<TransferResult, AccountError> {
        let CreateTransferInput {
            from_account_id,
            to_account_id,
            amount,
            currency,
        } = request;

        // Dropping the tx without commit rolls everything back.
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        let from = self
            .account_repo
            .get_account_in_tx(tx.as_mut(), from_account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if from.currency != currency {
            return Err(AccountError::CurrencyMismatch {
                account_id: from_account_id,
                expected: from.currency,
            });
        }
        if from.owner != owner {
            return Err(AccountError::NotOwner);
        }
        if from.balance < amount {
            return Err(AccountError::InsufficientBalance {
                account_id: from_account_id,
            });
        }

        let to = self
            .account_repo
            .get_account_in_tx(tx.as_mut(), to_account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if to.currency != currency {
            return Err(AccountError::CurrencyMismatch {
                account_id: to_account_id,
                expected: to.currency,
            });
        }

        let transfer = self
            .transfer_repo
            .create_transfer_in_tx(tx.as_mut(), from_account_id, to_account_id, amount, currency)
            .await?;

        let from_account = self
            .account_repo
            .add_balance_in_tx(tx.as_mut(), from_account_id, -amount)
            .await?;
        let to_account = self
            .account_repo
            .add_balance_in_tx(tx.as_mut(), to_account_id, amount)
            .await?;

        tx.commit()
            .await
            .map_err(|e| AccountError::Store(e.to_string()))?;

        Ok(TransferResult {
            transfer,
            from_account,
            to_account,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::StorageTx;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct NoopTxManager;
    struct NoopTx;

    #[async_trait::async_trait]
    impl TxManager for NoopTxManager {
        async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
            Ok(Box::new(NoopTx))
        }
    }

    #[async_trait::async_trait]
    impl<'t> StorageTx<'t> for NoopTx {
        async fn commit(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
        async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeBank {
        accounts: Mutex<HashMap<i64, Account>>,
        next_id: Mutex<i64>,
    }

    impl FakeBank {
        fn alloc_id(&self) -> i64 {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        }

        fn seed(&self, owner: &str, balance: i64, currency: Currency) -> i64 {
            let id = self.alloc_id();
            self.accounts.lock().unwrap().insert(
                id,
                Account {
                    id,
                    owner: owner.to_string(),
                    balance,
                    currency,
                    created_at: Utc::now(),
                },
            );
            id
        }
    }

    #[async_trait::async_trait]
    impl AccountRepo for FakeBank {
        async fn create_account(
            &self,
            owner: &str,
            currency: Currency,
        ) -> Result<Account, AccountError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts
                .values()
                .any(|a| a.owner == owner && a.currency == currency)
            {
                return Err(AccountError::AccountExists);
            }
            drop(accounts);
            let id = self.seed(owner, 0, currency);
            Ok(self.accounts.lock().unwrap()[&id].clone())
        }

        async fn get_account(&self, id: i64) -> Result<Option<Account>, AccountError> {
            Ok(self.accounts.lock().unwrap().get(&id).cloned())
        }

        async fn list_accounts(
            &self,
            owner: &str,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<Account>, AccountError> {
            let accounts = self.accounts.lock().unwrap();
            let mut owned: Vec<Account> = accounts
                .values()
                .filter(|a| a.owner == owner)
                .cloned()
                .collect();
            owned.sort_by_key(|a| a.id);
            Ok(owned
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn delete_account(&self, id: i64) -> Result<(), AccountError> {
            self.accounts.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn get_account_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            id: i64,
        ) -> Result<Option<Account>, AccountError> {
            self.get_account(id).await
        }

        async fn add_balance_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            id: i64,
            amount: i64,
        ) -> Result<Account, AccountError> {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts.get_mut(&id).ok_or(AccountError::AccountNotFound)?;
            account.balance += amount;
            Ok(account.clone())
        }
    }

    #[derive(Default)]
    struct FakeTransfers {
        next_id: Mutex<i64>,
    }

    #[async_trait::async_trait]
    impl TransferRepo for FakeTransfers {
        async fn create_transfer_in_tx<'t>(
            &self,
            _tx: &mut dyn StorageTx<'t>,
            from_account_id: i64,
            to_account_id: i64,
            amount: i64,
            currency: Currency,
        ) -> Result<Transfer, AccountError> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            Ok(Transfer {
                id: *next,
                from_account_id,
                to_account_id,
                amount,
                currency,
                created_at: Utc::now(),
            })
        }
    }

    fn service_with_bank() -> (RealAccountService, Arc<FakeBank>) {
        let bank = Arc::new(FakeBank::default());
        let service = RealAccountService::new(
            bank.clone(),
            Arc::new(FakeTransfers::default()),
            Arc::new(NoopTxManager),
        );
        (service, bank)
    }

    #[tokio::test]
    async fn create_account_rejects_duplicate_currency() {
        let (service, _) = service_with_bank();
        service.create_account("alice", Currency::Usd).await.unwrap();
        service.create_account("alice", Currency::Eur).await.unwrap();
        let err = service
            .create_account("alice", Currency::Usd)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AccountExists));
    }

    #[tokio::test]
    async fn get_account_enforces_ownership() {
        let (service, bank) = service_with_bank();
        let id = bank.seed("alice", 100, Currency::Usd);

        let account = service.get_account("alice", id).await.unwrap();
        assert_eq!(account.balance, 100);

        let err = service.get_account("mallory", id).await.unwrap_err();
        assert!(matches!(err, AccountError::NotOwner));

        let err = service.get_account("alice", id + 999).await.unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound));
    }

    #[tokio::test]
    async fn list_accounts_pages_by_owner() {
        let (service, bank) = service_with_bank();
        bank.seed("alice", 1, Currency::Usd);
        bank.seed("bob", 2, Currency::Usd);
        bank.seed("alice", 3, Currency::Eur);
        bank.seed("alice", 4, Currency::Cad);

        let page = service.list_accounts("alice", 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|a| a.owner == "alice"));

        let rest = service.list_accounts("alice", 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn transfer_moves_balance_atomically() {
        let (service, bank) = service_with_bank();
        let from = bank.seed("alice", 100, Currency::Usd);
        let to = bank.seed("bob", 50, Currency::Usd);

        let result = service
            .create_transfer(
                "alice",
                CreateTransferInput {
                    from_account_id: from,
                    to_account_id: to,
                    amount: 30,
                    currency: Currency::Usd,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.transfer.amount, 30);
        assert_eq!(result.from_account.balance, 70);
        assert_eq!(result.to_account.balance, 80);
    }

    #[tokio::test]
    async fn transfer_rejects_foreign_source_account() {
        let (service, bank) = service_with_bank();
        let from = bank.seed("alice", 100, Currency::Usd);
        let to = bank.seed("bob", 50, Currency::Usd);

        let err = service
            .create_transfer(
                "bob",
                CreateTransferInput {
                    from_account_id: from,
                    to_account_id: to,
                    amount: 30,
                    currency: Currency::Usd,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotOwner));
    }

    #[tokio::test]
    async fn transfer_rejects_currency_mismatch() {
        let (service, bank) = service_with_bank();
        let from = bank.seed("alice", 100, Currency::Usd);
        let to = bank.seed("bob", 50, Currency::Eur);

        let err = service
            .create_transfer(
                "alice",
                CreateTransferInput {
                    from_account_id: from,
                    to_account_id: to,
                    amount: 30,
                    currency: Currency::Usd,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::CurrencyMismatch { account_id, .. } if account_id == to
        ));
    }

    #[tokio::test]
    async fn transfer_rejects_insufficient_balance() {
        let (service, bank) = service_with_bank();
        let from = bank.seed("alice", 10, Currency::Usd);
        let to = bank.seed("bob", 0, Currency::Usd);

        let err = service
            .create_transfer(
                "alice",
                CreateTransferInput {
                    from_account_id: from,
                    to_account_id: to,
                    amount: 30,
                    currency: Currency::Usd,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::InsufficientBalance { account_id } if account_id == from
        ));
    }
}
