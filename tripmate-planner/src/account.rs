//! Login, registration and token verification.

use crate::error::{
    PlannerError, PlannerResult, LOGIN_FAILED, NOT_AUTHENTICATED, REGISTER_FAILED,
};
use crate::service::IdentityService;
use tripmate_core::{AuthToken, UserProfile};

/// A logged-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSession {
    pub token: AuthToken,
    pub user: UserProfile,
}

pub struct AccountAdapter<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S> AccountAdapter<'a, S>
where
    S: IdentityService + ?Sized,
{
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Exchange credentials for a token, then load the profile it belongs to.
    pub async fn login(&self, username: &str, password: &str) -> PlannerResult<AccountSession> {
        let token = self
            .service
            .login(username.trim(), password)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "login rejected");
                PlannerError::Identity(err.user_message(LOGIN_FAILED))
            })?;
        let user = self.verify(&token).await?;
        tracing::info!(username = %user.username, "logged in");
        Ok(AccountSession { token, user })
    }

    /// Create the account and log straight into it.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> PlannerResult<AccountSession> {
        let profile = self
            .service
            .register(username.trim(), password, email.trim())
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "registration rejected");
                PlannerError::Identity(err.user_message(REGISTER_FAILED))
            })?;
        tracing::info!(id = profile.id, username = %profile.username, "account registered");
        self.login(&profile.username, password).await
    }

    /// Check that a stored token is still accepted.
    pub async fn verify(&self, token: &AuthToken) -> PlannerResult<UserProfile> {
        self.service.current_user(token).await.map_err(|err| {
            tracing::info!(error = %err, "stored token rejected");
            PlannerError::Identity(NOT_AUTHENTICATED.to_string())
        })
    }
}
