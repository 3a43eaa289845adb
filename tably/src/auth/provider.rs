//! Identity provider interface
//!
//! Authentication is delegated to a managed identity service; this trait
//! is the seam. Customers get throwaway anonymous accounts, staff sign
//! in with email and password, and server-side endpoints verify bearer
//! tokens.

use async_trait::async_trait;
use shared::AppResult;

/// An authenticated principal as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub anonymous: bool,
}

/// A signed-in session: the principal plus its bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Mint a throwaway account for a seated customer
    async fn sign_in_anonymously(&self) -> AppResult<AuthSession>;

    /// Email/password sign-in for staff accounts
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Register a staff account. Fails if the email is taken.
    async fn register(&self, email: &str, password: &str) -> AppResult<String>;

    /// Resolve a bearer token to its principal
    async fn verify_token(&self, token: &str) -> AppResult<AuthUser>;
}
