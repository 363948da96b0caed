use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::PasswordError;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for signup, login and token rotation.
///
/// Every operation runs under `operation_timeout`; the deadline is dropped
/// with the operation on every exit path.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    operation_timeout: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    /// * `operation_timeout` - Deadline applied to each operation
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            authenticator,
            operation_timeout,
        }
    }

    async fn within_deadline<T>(
        &self,
        operation: impl Future<Output = Result<T, UserError>>,
    ) -> Result<T, UserError> {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .map_err(|_| UserError::Timeout(self.operation_timeout))?
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
            .map_err(|e| UserError::from(PasswordError::HashingFailed(e.to_string())))
    }

    /// Check the candidate password and issue a fresh pair on the blocking pool.
    async fn authenticate(&self, user: &User, candidate: String) -> Result<TokenPair, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let identity = user.identity();

        tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&candidate, &stored_hash, &identity)
        })
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => {
                UserError::from(PasswordError::HashingFailed(e.to_string()))
            }
            AuthenticationError::JwtError(e) => UserError::Token(e.to_string()),
        })
    }

    /// Spend the same verification work on an unknown account as on a real one.
    async fn reject_unknown_account(&self, candidate: String) -> Result<(), UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.reject_unknown_account(&candidate))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?;

        Ok(())
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, UserError> {
        self.authenticator
            .issue_tokens(&user.identity())
            .map_err(|e| UserError::Token(e.to_string()))
    }

    async fn persist_tokens(&self, user: &User, tokens: &TokenPair) -> Result<User, UserError> {
        self.repository
            .update_tokens(&user.id, tokens, Utc::now())
            .await?
            .ok_or_else(|| {
                UserError::Inconsistent(format!("user {} vanished before token update", user.id))
            })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError> {
        self.within_deadline(async move {
            let password_hash = self.hash_password(command.password).await?;

            let now = Utc::now();
            let mut user = User {
                id: UserId::new(),
                email: command.email,
                phone: command.phone,
                first_name: command.first_name,
                last_name: command.last_name,
                user_type: command.user_type,
                password_hash,
                token: String::new(),
                refresh_token: String::new(),
                created_at: now,
                updated_at: now,
            };

            let tokens = self.issue_tokens(&user)?;
            user.token = tokens.access_token;
            user.refresh_token = tokens.refresh_token;

            let created_user = self.repository.create(user).await.map_err(|e| {
                if e.is_conflict() {
                    tracing::info!(error = %e, "Signup rejected");
                }
                e
            })?;

            tracing::info!(
                user_id = %created_user.id,
                user_type = %created_user.user_type,
                "User signed up"
            );

            Ok(created_user)
        })
        .await
    }

    async fn login(&self, command: LoginCommand) -> Result<User, UserError> {
        self.within_deadline(async move {
            let email = EmailAddress::normalize(&command.email);

            let Some(user) = self.repository.find_by_email(&email).await? else {
                self.reject_unknown_account(command.password).await?;
                tracing::info!("Login rejected: unknown account");
                return Err(UserError::InvalidCredentials);
            };

            let tokens = self
                .authenticate(&user, command.password)
                .await
                .inspect_err(|e| {
                    if matches!(e, UserError::InvalidCredentials) {
                        tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
                    }
                })?;

            let updated_user = self.persist_tokens(&user, &tokens).await?;
            tracing::info!(user_id = %updated_user.id, "User logged in");

            Ok(updated_user)
        })
        .await
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<User, UserError> {
        self.within_deadline(async move {
            let claims = self
                .authenticator
                .validate_refresh_token(refresh_token)
                .map_err(|e| UserError::InvalidToken(e.to_string()))?;

            let user_id = UserId::from_string(&claims.sub)
                .map_err(|e| UserError::InvalidToken(e.to_string()))?;

            let user = self
                .repository
                .find_by_id(&user_id)
                .await?
                .ok_or_else(|| UserError::InvalidToken("unknown token subject".to_string()))?;

            if user.refresh_token != refresh_token {
                tracing::info!(user_id = %user.id, "Refresh rejected: superseded token");
                return Err(UserError::InvalidToken(
                    "refresh token has been superseded".to_string(),
                ));
            }

            let tokens = self.issue_tokens(&user)?;
            let Some(updated_user) = self
                .repository
                .replace_tokens(&user.id, refresh_token, &tokens, Utc::now())
                .await?
            else {
                tracing::info!(user_id = %user.id, "Refresh rejected: lost rotation race");
                return Err(UserError::InvalidToken(
                    "refresh token has been superseded".to_string(),
                ));
            };
            tracing::debug!(user_id = %updated_user.id, "Tokens refreshed");

            Ok(updated_user)
        })
        .await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.within_deadline(async move {
            self.repository
                .find_by_id(id)
                .await?
                .ok_or(UserError::NotFound(id.to_string()))
        })
        .await
    }
}
