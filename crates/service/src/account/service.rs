use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};

use super::domain::{Account, AccountSession, LoginForm, RegistrationForm, EMAIL_TAKEN, USERNAME_TAKEN};
use super::repository::AccountRepository;
use super::session::{SessionClaims, SessionKeys};
use crate::errors::ServiceError;
use crate::validation::FieldError;

/// Account business service independent of web framework
pub struct AccountService<R: AccountRepository> {
    repo: Arc<R>,
    sessions: SessionKeys,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: Arc<R>, sessions: SessionKeys) -> Self { Self { repo, sessions } }

    pub fn sessions(&self) -> &SessionKeys {
        &self.sessions
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::account::{AccountService, repository::mock::MockAccountRepository, session::SessionKeys};
    /// use service::account::domain::RegistrationForm;
    /// use std::sync::Arc;
    /// let svc = AccountService::new(Arc::new(MockAccountRepository::default()), SessionKeys::random(1));
    /// let form = RegistrationForm {
    ///     username: "tester".into(),
    ///     email: "user@example.com".into(),
    ///     password: "Secret123".into(),
    ///     confirm_password: "Secret123".into(),
    /// };
    /// let account = tokio_test::block_on(svc.register(form)).unwrap();
    /// assert_eq!(account.email, "user@example.com");
    /// assert_ne!(account.password_hash, "Secret123");
    /// ```
    #[instrument(skip(self, form), fields(username = %form.username, email = %form.email))]
    pub async fn register(&self, form: RegistrationForm) -> Result<Account, ServiceError> {
        let mut errors = form.validate();
        if !form.username.trim().is_empty() && self.repo.find_by_username(form.username.trim()).await?.is_some() {
            errors.push(FieldError::new("username", USERNAME_TAKEN));
        }
        if !form.email.trim().is_empty() && self.repo.find_by_email(form.email.trim()).await?.is_some() {
            errors.push(FieldError::new("email", EMAIL_TAKEN));
        }
        if !errors.is_empty() {
            debug!(count = errors.len(), "registration rejected");
            return Err(ServiceError::Validation(errors));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(form.password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Hash(e.to_string()))?
            .to_string();

        let account = self.repo.create(form.username.trim(), form.email.trim(), &hash).await?;
        info!(user_id = account.id, username = %account.username, "user_registered");
        Ok(account)
    }

    /// Check credentials and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::account::{AccountService, repository::mock::MockAccountRepository, session::SessionKeys};
    /// use service::account::domain::{LoginForm, RegistrationForm};
    /// use std::sync::Arc;
    /// let svc = AccountService::new(Arc::new(MockAccountRepository::default()), SessionKeys::random(1));
    /// let _ = tokio_test::block_on(svc.register(RegistrationForm {
    ///     username: "nick".into(), email: "u@e.com".into(),
    ///     password: "Passw0rd".into(), confirm_password: "Passw0rd".into(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginForm { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.account.username, "nick");
    /// assert_eq!(svc.authenticate(&session.token).unwrap().uid, session.account.id);
    /// ```
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn login(&self, form: LoginForm) -> Result<AccountSession, ServiceError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let Some(account) = self.repo.find_by_email(form.email.trim()).await? else {
            warn!("login for unknown email");
            return Err(ServiceError::Unauthorized);
        };

        let parsed = PasswordHash::new(&account.password_hash).map_err(|e| ServiceError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(form.password.as_bytes(), &parsed).is_err() {
            warn!(user_id = account.id, "password mismatch");
            return Err(ServiceError::Unauthorized);
        }

        let token = self.sessions.issue(account.id)?;
        info!(user_id = account.id, "user_logged_in");
        Ok(AccountSession { account, token })
    }

    /// Validate a session token taken from a cookie.
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        self.sessions.verify(token)
    }

    pub async fn get(&self, id: i32) -> Result<Account, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::repo::seaorm::SeaOrmAccountRepository;
    use crate::account::repository::mock::MockAccountRepository;
    use crate::test_support::get_db;

    fn service() -> (Arc<MockAccountRepository>, AccountService<MockAccountRepository>) {
        let repo = Arc::new(MockAccountRepository::default());
        let svc = AccountService::new(Arc::clone(&repo), SessionKeys::new("unit-test-secret-key", 1));
        (repo, svc)
    }

    fn registration(username: &str, email: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.into(),
            email: email.into(),
            password: "Secret123".into(),
            confirm_password: "Secret123".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_field_error() {
        let (repo, svc) = service();
        svc.register(registration("first", "same@example.com")).await.unwrap();

        let err = svc.register(registration("second", "same@example.com")).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors, vec![FieldError::new("email", EMAIL_TAKEN)]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_field_error() {
        let (_repo, svc) = service();
        svc.register(registration("taken", "a@example.com")).await.unwrap();
        let err = svc.register(registration("taken", "b@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e[0].message == USERNAME_TAKEN));
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let (_repo, svc) = service();
        let account = svc.register(registration("hashme", "h@example.com")).await.unwrap();
        assert!(account.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn login_requires_matching_password() {
        let (_repo, svc) = service();
        svc.register(registration("carol", "carol@example.com")).await.unwrap();

        let bad = svc.login(LoginForm { email: "carol@example.com".into(), password: "nope".into() }).await;
        assert!(matches!(bad, Err(ServiceError::Unauthorized)));

        let unknown = svc.login(LoginForm { email: "ghost@example.com".into(), password: "Secret123".into() }).await;
        assert!(matches!(unknown, Err(ServiceError::Unauthorized)));

        let ok = svc.login(LoginForm { email: "carol@example.com".into(), password: "Secret123".into() }).await.unwrap();
        let claims = svc.authenticate(&ok.token).unwrap();
        assert_eq!(claims.uid, ok.account.id);
    }

    #[tokio::test]
    async fn duplicate_email_leaves_one_row_on_sqlite() -> Result<(), anyhow::Error> {
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

        let (_dir, db) = get_db().await?;
        let repo = Arc::new(SeaOrmAccountRepository { db: db.clone() });
        let svc = AccountService::new(repo, SessionKeys::new("unit-test-secret-key", 1));

        let first = svc.register(registration("dana", "dana@example.com")).await?;
        let err = svc.register(registration("dana2", "dana@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let rows = models::user::Entity::find()
            .filter(models::user::Column::Email.eq("dana@example.com"))
            .count(&db)
            .await?;
        assert_eq!(rows, 1);
        assert_eq!(svc.get(first.id).await?.username, "dana");
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let (_repo, svc) = service();
        assert!(matches!(svc.get(99).await, Err(ServiceError::NotFound(_))));
    }
}
