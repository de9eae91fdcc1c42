use async_trait::async_trait;

use super::domain::Account;
use crate::errors::ServiceError;

/// Repository abstraction for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError>;
    async fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<Account, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAccountRepository {
        users: Mutex<Vec<Account>>,
    }

    impl MockAccountRepository {
        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_by_id(&self, id: i32) -> Result<Option<Account>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<Account, ServiceError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == username || u.email == email) {
                return Err(ServiceError::Conflict("user already exists".into()));
            }
            let account = Account {
                id: users.len() as i32 + 1,
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                picture: None,
            };
            users.push(account.clone());
            Ok(account)
        }
    }
}
