use models::user;
use serde::{Deserialize, Serialize};

use crate::validation::{require, FieldError};

pub const USERNAME_TAKEN: &str = "This username is already taken. Please choose a different username.";
pub const EMAIL_TAKEN: &str = "This email address is already linked to a registered account.";

/// Registration form as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Field checks that need no database access.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if require(&mut errors, "username", &self.username) && user::validate_username(&self.username).is_err() {
            errors.push(FieldError::new(
                "username",
                format!("Field must be between {} and {} characters long.", user::USERNAME_MIN, user::USERNAME_MAX),
            ));
        }
        if require(&mut errors, "email", &self.email) && user::validate_email(&self.email).is_err() {
            errors.push(FieldError::new("email", "Invalid email address."));
        }
        require(&mut errors, "password", &self.password);
        if require(&mut errors, "confirm_password", &self.confirm_password) && self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "Field must be equal to password."));
        }
        errors
    }
}

/// Login form as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if require(&mut errors, "email", &self.email) && user::validate_email(&self.email).is_err() {
            errors.push(FieldError::new("email", "Invalid email address."));
        }
        require(&mut errors, "password", &self.password);
        errors
    }
}

/// Domain user (business view of a `user` row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub picture: Option<Vec<u8>>,
}

impl From<user::Model> for Account {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, username: m.username, email: m.email, password_hash: m.password, picture: m.picture }
    }
}

/// Login result: the account plus a signed session token.
#[derive(Debug, Clone)]
pub struct AccountSession {
    pub account: Account,
    pub token: String,
}
