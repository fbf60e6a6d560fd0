use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use chrono::Duration;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub token_maker: Arc<dyn TokenMaker>,
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pool: Pool<MySql>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let redis_client = redis::Client::open(settings.redis.dsn.as_str())?;
        let redis_manager = redis_client.get_connection_manager().await?;

        let pool = Pool::<MySql>::connect(&settings.mysql.dsn).await?;
        let tx_manager: Arc<dyn TxManager> = Arc::new(MySqlTxManager::new(pool.clone()));

        let key = settings.auth.symmetric_key.as_bytes();
        let token_maker: Arc<dyn TokenMaker> = match settings.auth.token_backend.as_str() {
            "jwt" => Arc::new(JwtTokenMaker::new(key)?),
            "encrypted" => Arc::new(EncryptedTokenMaker::new(key)?),
            other => return Err(anyhow::anyhow!("Unknown token backend: {}", other)),
        };

        let session_store: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(
            redis_manager.clone(),
            settings.redis.session_prefix.clone(),
        ));

        let credential_hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2PasswordHasher {});
        let user_repo: Arc<dyn UserRepo> = Arc::new(MySqlUserRepo::new(pool.clone()));
        let account_repo: Arc<dyn AccountRepo> = Arc::new(MySqlAccountRepo::new(pool.clone()));
        let transfer_repo: Arc<dyn TransferRepo> = Arc::new(MySqlTransferRepo::new());

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            user_repo,
            credential_hasher,
            token_maker.clone(),
            session_store,
            Duration::seconds(settings.auth.access_ttl_secs),
            Duration::seconds(settings.auth.refresh_ttl_secs),
        ));

        let account_service: Arc<dyn AccountService> = Arc::new(RealAccountService::new(
            account_repo,
            transfer_repo,
            tx_manager,
        ));

        info!("server started");

        Ok(Self {
            token_maker,
            auth_service,
            account_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        self.pool.close().await;
    }
}
