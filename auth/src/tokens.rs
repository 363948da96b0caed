use chrono::Duration;
use serde::Deserialize;

use crate::jwt::AccessClaims;
use crate::jwt::IdentityClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;
use crate::jwt::TokenKind;

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and validates signed access/refresh token pairs.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

#[derive(Deserialize)]
struct KindProbe {
    kind: TokenKind,
}

impl TokenIssuer {
    /// Create a token issuer.
    ///
    /// # Arguments
    /// * `secret` - Signing secret shared by both token kinds
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Sign a fresh token pair for an identity.
    ///
    /// Every pair carries new token identifiers, so two pairs issued within
    /// the same second are still distinct.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn generate_tokens(&self, identity: &IdentityClaims) -> Result<TokenPair, JwtError> {
        let access_claims = AccessClaims::for_identity(identity, self.access_ttl);
        let refresh_claims = RefreshClaims::for_user(&identity.user_id, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.jwt_handler.encode(&access_claims)?,
            refresh_token: self.jwt_handler.encode(&refresh_claims)?,
        })
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `WrongTokenKind` - A refresh token was presented
    /// * `TokenExpired`, `InvalidToken`, `DecodingFailed` - See [`JwtHandler::decode`]
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.expect_kind(token, TokenKind::Access)?;
        self.jwt_handler.decode(token)
    }

    /// Validate a refresh token and return its claims.
    ///
    /// # Errors
    /// * `WrongTokenKind` - An access token was presented
    /// * `TokenExpired`, `InvalidToken`, `DecodingFailed` - See [`JwtHandler::decode`]
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.expect_kind(token, TokenKind::Refresh)?;
        self.jwt_handler.decode(token)
    }

    fn expect_kind(&self, token: &str, expected: TokenKind) -> Result<(), JwtError> {
        let probe: KindProbe = self.jwt_handler.decode(token)?;

        if probe.kind != expected {
            return Err(JwtError::WrongTokenKind {
                expected,
                actual: probe.kind,
            });
        }

        Ok(())
    }
}
