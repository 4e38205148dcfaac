//! Authentication service - Login, signup and the session pointer.
//!
//! Passwords are compared in plain text; there is no security model here,
//! only identification of who is using the device.

use async_trait::async_trait;

use common::{AppError, AppResult, ServiceConfig};
use domain::{new_id, validate_input, CreateUser, User, UserRole, USER_ID_PREFIX};

use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in by full email or email local part
    async fn login(&self, identifier: &str, password: &str) -> AppResult<User>;

    /// Register a new user and sign them in
    async fn signup(&self, input: CreateUser) -> AppResult<User>;

    /// Clear the session
    async fn logout(&self) -> AppResult<()>;

    /// User the session points to; `None` when signed out or orphaned
    async fn current_user(&self) -> AppResult<Option<User>>;
}

/// Concrete implementation of AuthService over local persistence.
pub struct Authenticator {
    persistence: Persistence,
    config: ServiceConfig,
}

impl Authenticator {
    pub fn new(persistence: Persistence, config: ServiceConfig) -> Self {
        Self {
            persistence,
            config,
        }
    }

    /// Simulated round-trip to a remote backend
    async fn simulate_latency(&self) {
        let latency = self.config.auth_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, identifier: &str, password: &str) -> AppResult<User> {
        self.simulate_latency().await;

        let users = self.persistence.load::<User>().await?;
        let user = users
            .into_iter()
            .find(|u| u.matches_login(identifier))
            .ok_or_else(|| {
                tracing::warn!(identifier, "login for unknown user");
                AppError::not_found("User")
            })?;

        if !user.check_password(password) {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.persistence.store().set_session(&user.id).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(user)
    }

    async fn signup(&self, input: CreateUser) -> AppResult<User> {
        let input = CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            password: input.password,
        };
        validate_input(&input)?;

        self.simulate_latency().await;

        let mut users = self.persistence.load::<User>().await?;
        if users.iter().any(|u| u.email == input.email) {
            tracing::warn!(email = %input.email, "signup with registered email");
            return Err(AppError::DuplicateEmail);
        }

        // The very first account administers the household
        let role = if users.is_empty() {
            UserRole::Admin
        } else {
            UserRole::Member
        };
        let user = User::new(
            new_id(USER_ID_PREFIX),
            input.name,
            input.email,
            input.password,
            role,
        );

        users.push(user.clone());
        self.persistence.save(&users).await?;
        self.persistence.store().set_session(&user.id).await?;

        tracing::info!(user_id = %user.id, %role, "user signed up");
        Ok(user)
    }

    async fn logout(&self) -> AppResult<()> {
        self.persistence.store().clear_session().await?;
        tracing::info!("user logged out");
        Ok(())
    }

    async fn current_user(&self) -> AppResult<Option<User>> {
        let Some(user_id) = self.persistence.store().session().await? else {
            return Ok(None);
        };
        let user = self
            .persistence
            .load::<User>()
            .await?
            .into_iter()
            .find(|u| u.id == user_id);
        if user.is_none() {
            tracing::debug!(%user_id, "session points to a missing user");
        }
        Ok(user)
    }
}
