use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

use super::shared::{validate_email, validate_name, validate_password};

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Display name (1-64 characters).
    #[schema(example = "Sita Sharma")]
    pub name: String,
    /// Unique email address.
    #[schema(example = "sita@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    Ok(())
}

/// Request body for credential login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "sita@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
    #[schema(example = "Sita Sharma")]
    pub name: String,
    #[schema(example = "sita@example.com")]
    pub email: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub name: String,
    pub email: String,
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["create_words"]))]
    pub permissions: Vec<String>,
}

/// Current authenticated user's token identity.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "editor")]
    pub role: String,
    pub permissions: Vec<String>,
}
