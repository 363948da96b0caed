use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number must contain between {min} and {max} digits, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Phone number may only contain digits and an optional leading '+'")]
    InvalidCharacters,
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Error for UserType parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserTypeError {
    #[error("Unknown user type '{0}' (expected ADMIN or USER)")]
    Unknown(String),
}

/// Error for password hashing operations
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password hashing task failed: {0}")]
    TaskFailed(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid user type: {0}")]
    InvalidUserType(#[from] UserTypeError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Phone number already exists: {0}")]
    PhoneAlreadyExists(String),

    #[error("{}", auth::INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A record that was just read or written could not be found again
    #[error("User record inconsistent: {0}")]
    Inconsistent(String),

    // Infrastructure errors
    #[error("Token signing failed: {0}")]
    Token(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserError {
    /// Whether the error is a duplicate email or phone.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            UserError::EmailAlreadyExists(_) | UserError::PhoneAlreadyExists(_)
        )
    }
}
