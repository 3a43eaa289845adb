//! In-process identity provider
//!
//! Backs tests and local operation. Accounts and issued tokens live in
//! concurrent maps; tokens are opaque and never expire.

use super::provider::{AuthSession, AuthUser, IdentityProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use shared::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
}

#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    /// email -> account
    accounts: DashMap<String, Account>,
    /// bearer token -> principal
    tokens: DashMap<String, AuthUser>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&self, user: AuthUser) -> AuthSession {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user.clone());
        AuthSession { user, token }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in_anonymously(&self) -> AppResult<AuthSession> {
        let user = AuthUser {
            uid: uuid::Uuid::new_v4().to_string(),
            email: None,
            anonymous: true,
        };
        Ok(self.issue(user))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let account = self
            .accounts
            .get(email)
            .ok_or_else(|| AppError::invalid_credentials())?;
        if account.password != password {
            return Err(AppError::invalid_credentials());
        }
        let user = AuthUser {
            uid: account.uid.clone(),
            email: Some(email.to_string()),
            anonymous: false,
        };
        drop(account);
        Ok(self.issue(user))
    }

    async fn register(&self, email: &str, password: &str) -> AppResult<String> {
        if self.accounts.contains_key(email) {
            return Err(AppError::already_exists(email));
        }
        let uid = uuid::Uuid::new_v4().to_string();
        self.accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        Ok(uid)
    }

    async fn verify_token(&self, token: &str) -> AppResult<AuthUser> {
        self.tokens
            .get(token)
            .map(|user| user.clone())
            .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))
    }
}
