use async_trait::async_trait;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user and issue its first token pair.
    ///
    /// # Arguments
    /// * `command` - Validated signup fields and plaintext password
    ///
    /// # Returns
    /// Persisted user entity with hashed password and tokens
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone number is already registered
    /// * `Password` / `Token` - Hashing or signing failed
    /// * `Timeout` - Operation exceeded its deadline
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError>;

    /// Verify credentials and rotate the user's token pair.
    ///
    /// # Arguments
    /// * `command` - Email and candidate password
    ///
    /// # Returns
    /// User entity as stored after the token update
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Inconsistent` - User disappeared between lookup and update
    /// * `Token` - Signing failed
    /// * `Timeout` - Operation exceeded its deadline
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<User, UserError>;

    /// Exchange the latest refresh token for a new token pair.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, expired, not a refresh token,
    ///   or no longer the latest one stored for the user
    /// * `Token` - Signing failed
    /// * `Timeout` - Operation exceeded its deadline
    /// * `DatabaseError` - Database operation failed
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// Email and phone uniqueness are checked and the record inserted as one
    /// atomic step: nothing is written unless both checks pass.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone number is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Store the latest token pair and bump `updated_at`.
    ///
    /// Writing the same pair twice leaves the record unchanged apart from
    /// `updated_at`.
    ///
    /// # Returns
    /// Updated user entity (None if the user does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update_tokens(
        &self,
        id: &UserId,
        tokens: &TokenPair,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserError>;

    /// Store a new token pair only if `current_refresh_token` is still the
    /// latest refresh token stored for the user.
    ///
    /// The comparison and the write are one atomic step, so of two callers
    /// presenting the same refresh token at most one succeeds.
    ///
    /// # Returns
    /// Updated user entity (None if the user does not exist or the stored
    /// refresh token differs)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn replace_tokens(
        &self,
        id: &UserId,
        current_refresh_token: &str,
        tokens: &TokenPair,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserError>;
}
