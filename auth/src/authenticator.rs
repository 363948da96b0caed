use std::sync::OnceLock;

use crate::jwt::AccessClaims;
use crate::jwt::IdentityClaims;
use crate::jwt::JwtError;
use crate::jwt::RefreshClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::tokens::TokenIssuer;
use crate::tokens::TokenPair;

/// Message reported for every failed credential check.
///
/// Unknown accounts and wrong passwords share it so callers cannot tell them apart.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "login or password is incorrect";

const DECOY_PASSWORD: &str = "decoy-password-never-accepted";

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    /// Hash verified against when no stored hash exists; built on first use.
    decoy_hash: OnceLock<Option<String>>,
}

/// Outcome of comparing a candidate password with a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    pub valid: bool,
    pub reason: Option<&'static str>,
}

impl PasswordCheck {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected() -> Self {
        Self {
            valid: false,
            reason: Some(INVALID_CREDENTIALS_MESSAGE),
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("login or password is incorrect")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher configured with the desired cost
    /// * `token_issuer` - Issuer holding the signing secret and token lifetimes
    pub fn new(password_hasher: PasswordHasher, token_issuer: TokenIssuer) -> Self {
        Self {
            password_hasher,
            token_issuer,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Compare a candidate password with a stored hash.
    ///
    /// A malformed stored hash is reported exactly like a mismatch.
    pub fn verify_password(&self, stored_hash: &str, candidate: &str) -> PasswordCheck {
        match self.password_hasher.verify(candidate, stored_hash) {
            Ok(true) => PasswordCheck::accepted(),
            Ok(false) | Err(_) => PasswordCheck::rejected(),
        }
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs a full verification against a decoy hash of the same cost so the
    /// rejection takes as long as a wrong password does. Always rejects.
    pub fn reject_unknown_account(&self, candidate: &str) -> PasswordCheck {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(hash) = decoy {
            let _ = self.password_hasher.verify(candidate, hash);
        }

        PasswordCheck::rejected()
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &IdentityClaims,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(stored_hash, password).valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_issuer.generate_tokens(identity)?)
    }

    /// Issue a token pair without password verification.
    ///
    /// Used at signup and on refresh, where identity is already established.
    pub fn issue_tokens(&self, identity: &IdentityClaims) -> Result<TokenPair, JwtError> {
        self.token_issuer.generate_tokens(identity)
    }

    /// Validate an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.token_issuer.validate_access_token(token)
    }

    /// Validate a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.token_issuer.validate_refresh_token(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::password::HashingCost;

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let issuer = TokenIssuer::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(15),
            Duration::days(7),
        );
        Authenticator::new(hasher, issuer)
    }

    fn identity() -> IdentityClaims {
        IdentityClaims {
            user_id: "user123".to_string(),
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            user_type: "USER".to_string(),
        }
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let pair = authenticator
            .authenticate("my_password", &hash, &identity())
            .expect("Authentication failed");

        let claims = authenticator
            .validate_access_token(&pair.access_token)
            .expect("Token validation failed");
        assert_eq!(claims.sub, "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("wrong_password", &hash, &identity());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_reports_generic_reason() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("pw").unwrap();

        assert_eq!(
            authenticator.verify_password(&hash, "pw"),
            PasswordCheck {
                valid: true,
                reason: None
            }
        );

        let mismatch = authenticator.verify_password(&hash, "wrong");
        let malformed = authenticator.verify_password("not-a-hash", "pw");

        assert!(!mismatch.valid);
        assert_eq!(mismatch, malformed);
        assert_eq!(mismatch.reason, Some(INVALID_CREDENTIALS_MESSAGE));
    }

    #[test]
    fn test_reject_unknown_account_verifies_against_decoy() {
        let authenticator = authenticator();
        assert!(authenticator.decoy_hash.get().is_none());

        let check = authenticator.reject_unknown_account("pw");
        let decoy = authenticator
            .decoy_hash
            .get()
            .cloned()
            .flatten()
            .expect("decoy hash should be built");

        assert!(decoy.starts_with("$argon2id$"));
        assert_eq!(check, authenticator.verify_password(&decoy, "pw"));
        assert_eq!(check.reason, Some(INVALID_CREDENTIALS_MESSAGE));

        // Even the decoy plaintext is refused.
        assert!(!authenticator.reject_unknown_account(DECOY_PASSWORD).valid);
    }

    #[test]
    fn test_invalid_credentials_message_is_stable() {
        assert_eq!(
            AuthenticationError::InvalidCredentials.to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        assert!(authenticator
            .validate_access_token("invalid.token.here")
            .is_err());
        assert!(authenticator
            .validate_refresh_token("invalid.token.here")
            .is_err());
    }
}
