use sea_orm::DatabaseConnection;

use crate::account::domain::Account;
use crate::account::repository::AccountRepository;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, ServiceError> {
        Ok(models::user::find_by_id(&self.db, id).await?.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(models::user::find_by_email(&self.db, email).await?.map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError> {
        Ok(models::user::find_by_username(&self.db, username).await?.map(Account::from))
    }

    async fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<Account, ServiceError> {
        let created = models::user::create(&self.db, username, email, password_hash).await?;
        Ok(created.into())
    }
}
