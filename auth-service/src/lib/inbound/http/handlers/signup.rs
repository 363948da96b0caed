use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UserType;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PhoneError;
use crate::user::errors::UserTypeError;

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = payload?;

    state
        .user_service
        .signup(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for signing up (raw JSON)
///
/// Every field is optional here so a missing one is reported by name
/// instead of as a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    user_type: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneError),

    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    #[error("Invalid user type: {0}")]
    UserType(#[from] UserTypeError),
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ParseSignupRequestError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ParseSignupRequestError::MissingField(field))
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        let email = EmailAddress::new(required("email", self.email)?)?;
        let phone = PhoneNumber::new(required("phone", self.phone)?)?;
        let password = required("password", self.password)?;
        let first_name = PersonName::new("first_name", required("first_name", self.first_name)?)?;
        let last_name = PersonName::new("last_name", required("last_name", self.last_name)?)?;
        let user_type = required("user_type", self.user_type)?.parse::<UserType>()?;

        Ok(SignupCommand {
            email,
            phone,
            first_name,
            last_name,
            user_type,
            password,
        })
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignupRequest {
        SignupRequest {
            email: Some("a@x.com".to_string()),
            phone: Some("555".to_string()),
            password: Some("pw".to_string()),
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            user_type: Some("USER".to_string()),
        }
    }

    #[test]
    fn test_valid_request_parses() {
        let command = request().try_into_command().unwrap();

        assert_eq!(command.email.as_str(), "a@x.com");
        assert_eq!(command.phone.as_str(), "555");
        assert_eq!(command.password, "pw");
        assert_eq!(command.user_type, UserType::User);
    }

    #[test]
    fn test_missing_fields_are_named() {
        let mut body = request();
        body.phone = None;
        let err = body.try_into_command().unwrap_err();
        assert_eq!(err.to_string(), "phone is required");

        let mut body = request();
        body.password = Some(String::new());
        let err = body.try_into_command().unwrap_err();
        assert_eq!(err.to_string(), "password is required");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut body = request();
        body.user_type = Some("SUPERUSER".to_string());
        assert!(matches!(
            body.try_into_command(),
            Err(ParseSignupRequestError::UserType(_))
        ));

        let mut body = request();
        body.email = Some("not-an-email".to_string());
        assert!(matches!(
            body.try_into_command(),
            Err(ParseSignupRequestError::Email(_))
        ));
    }
}
