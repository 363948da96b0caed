use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod get_current_user;
pub mod login;
pub mod refresh_tokens;
pub mod signup;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPhone(_)
            | UserError::InvalidName(_)
            | UserError::InvalidUserType(_)
            | UserError::InvalidCredentials => ApiError::BadRequest(err.to_string()),
            UserError::EmailAlreadyExists(_) | UserError::PhoneAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidToken(_) => {
                tracing::debug!(error = %err, "Token rejected");
                ApiError::Unauthorized("invalid or expired token".to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::Timeout(_) => {
                tracing::error!(error = %err, "Request deadline exceeded");
                ApiError::InternalServerError("request timed out".to_string())
            }
            UserError::Inconsistent(_)
            | UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Failed to parse body: {}", rejection.body_text()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// User record as returned to clients. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub user_id: String,
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email.to_string(),
            phone: user.phone.to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            user_type: user.user_type.to_string(),
            token: user.token.clone(),
            refresh_token: user.refresh_token.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::user::errors::EmailError;
    use crate::user::errors::PasswordError;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = UserError::from(EmailError::InvalidFormat("missing @".to_string()));
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(msg) if msg.contains("email")));
    }

    #[test]
    fn test_conflicts_map_to_409() {
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyExists("a@x.com".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::PhoneAlreadyExists("555".to_string())),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_invalid_credentials_use_generic_message() {
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::BadRequest(auth::INVALID_CREDENTIALS_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let errors = [
            UserError::DatabaseError("password=hunter2 host=db".to_string()),
            UserError::Password(PasswordError::HashingFailed("rng".to_string())),
            UserError::Token("bad key".to_string()),
            UserError::Inconsistent("user vanished".to_string()),
        ];

        for err in errors {
            assert_eq!(
                ApiError::from(err),
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            );
        }

        assert_eq!(
            ApiError::from(UserError::Timeout(Duration::from_secs(100))),
            ApiError::InternalServerError("request timed out".to_string())
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::Conflict("taken".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
