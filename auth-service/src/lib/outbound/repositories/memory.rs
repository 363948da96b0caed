use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-process implementation of UserRepository.
///
/// Uniqueness checks and the insert happen under one write lock, so of two
/// racing signups sharing an email or phone exactly one succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        if users.values().any(|u| u.phone == user.phone) {
            return Err(UserError::PhoneAlreadyExists(user.phone.to_string()));
        }

        users.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "User stored in memory");

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update_tokens(
        &self,
        id: &UserId,
        tokens: &TokenPair,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserError> {
        let mut users = self.users.write().await;

        Ok(users.get_mut(id).map(|user| {
            user.token = tokens.access_token.clone();
            user.refresh_token = tokens.refresh_token.clone();
            user.updated_at = updated_at;
            user.clone()
        }))
    }

    async fn replace_tokens(
        &self,
        id: &UserId,
        current_refresh_token: &str,
        tokens: &TokenPair,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserError> {
        let mut users = self.users.write().await;

        Ok(users
            .get_mut(id)
            .filter(|user| user.refresh_token == current_refresh_token)
            .map(|user| {
                user.token = tokens.access_token.clone();
                user.refresh_token = tokens.refresh_token.clone();
                user.updated_at = updated_at;
                user.clone()
            }))
    }
}
