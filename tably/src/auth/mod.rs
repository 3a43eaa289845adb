//! Authentication and roles
//!
//! Three principals use the platform:
//!
//! - customers, signed in anonymously the moment they scan a code,
//! - cafe owners, whose generated credentials live on the cafe document
//!   and are mirrored into the identity provider at first login,
//! - the platform admin, a single fixed account.
//!
//! Owner login cross-checks the credential pair stored on the cafe
//! document before touching the provider, so a cafe's credentials work
//! even before a provider account exists for them.

mod mock;
mod provider;

pub use mock::MockIdentityProvider;
pub use provider::{AuthSession, AuthUser, IdentityProvider};

use crate::store::{DocumentStore, Query, WriteBatch};
use serde_json::json;
use shared::models::{collections, Cafe};
use shared::{AppError, AppResult};

/// Fixed platform-admin credentials
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
const ADMIN_EMAIL: &str = "admin@tably.app";

/// Domain for the provider accounts derived from owner usernames
const OWNER_EMAIL_DOMAIN: &str = "owner.tably.app";

/// What a successful login is allowed to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Platform admin: onboarding and the all-cafes console
    Admin,
    /// Cafe owner: the dashboard for one cafe
    Owner { cafe_id: String },
    /// Seated customer: menu, cart and orders for one table
    Customer,
}

/// A signed-in principal with its resolved role
#[derive(Debug, Clone)]
pub struct Login {
    pub session: AuthSession,
    pub role: Role,
}

/// Anonymous customer sign-in at session entry
pub async fn customer_login(provider: &dyn IdentityProvider) -> AppResult<Login> {
    let session = provider.sign_in_anonymously().await?;
    Ok(Login {
        session,
        role: Role::Customer,
    })
}

/// Staff login form: the fixed admin pair, otherwise an owner username.
pub async fn staff_login(
    store: &DocumentStore,
    provider: &dyn IdentityProvider,
    username: &str,
    password: &str,
) -> AppResult<Login> {
    if username == ADMIN_USERNAME {
        if password != ADMIN_PASSWORD {
            return Err(AppError::invalid_credentials());
        }
        let session = ensure_and_sign_in(provider, ADMIN_EMAIL, password).await?;
        return Ok(Login {
            session,
            role: Role::Admin,
        });
    }
    owner_login(store, provider, username, password).await
}

/// Owner login: cross-check the pair stored on the cafe document, then
/// sign in against the provider under the derived email, creating the
/// provider account on first login. The cafe's `ownerUserId` is linked
/// (or re-linked) to the resulting uid.
async fn owner_login(
    store: &DocumentStore,
    provider: &dyn IdentityProvider,
    username: &str,
    password: &str,
) -> AppResult<Login> {
    let docs = store
        .run_query(
            &Query::collection(collections::CAFES)
                .where_eq("ownerUsername", username)
                .with_limit(1),
        )
        .await;
    let Some(doc) = docs.into_iter().next() else {
        // Same error as a bad password: don't leak which usernames exist.
        return Err(AppError::invalid_credentials());
    };
    let cafe: Cafe =
        serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))?;
    if cafe.owner_password != password {
        return Err(AppError::invalid_credentials());
    }

    let email = format!("{}@{}", username, OWNER_EMAIL_DOMAIN);
    let session = ensure_and_sign_in(provider, &email, password).await?;

    if cafe.owner_user_id != session.user.uid {
        store
            .commit(WriteBatch::new().update(
                collections::CAFES,
                cafe.id.clone(),
                vec![("ownerUserId".to_string(), json!(session.user.uid))],
            ))
            .await?;
        tracing::info!(cafe_id = %cafe.id, "owner account linked");
    }

    Ok(Login {
        session,
        role: Role::Owner { cafe_id: cafe.id },
    })
}

/// Sign in, registering the account first if the provider has never seen
/// this email.
async fn ensure_and_sign_in(
    provider: &dyn IdentityProvider,
    email: &str,
    password: &str,
) -> AppResult<AuthSession> {
    match provider.sign_in_with_password(email, password).await {
        Ok(session) => Ok(session),
        Err(err) if err.code == shared::ErrorCode::InvalidCredentials => {
            provider.register(email, password).await?;
            provider.sign_in_with_password(email, password).await
        }
        Err(err) => Err(err),
    }
}
