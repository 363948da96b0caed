pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AccessClaims;
pub use claims::IdentityClaims;
pub use claims::RefreshClaims;
pub use claims::TokenKind;
pub use errors::JwtError;
pub use handler::JwtHandler;
