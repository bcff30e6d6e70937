use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::permissions::{self, Action, Role};
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Permission checks happen via `require()` in the handler body.
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub permissions: Vec<String>,
}

impl AuthUser {
    /// Returns `Ok(())` if the user may perform `action`,
    /// `Err(PermissionDenied)` otherwise.
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        if permissions::allows(self.role, &self.permissions, action) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    fn from_claims(claims: jwt::Claims) -> Result<Self, AppError> {
        let role = Role::parse(&claims.role).ok_or(AppError::TokenInvalid)?;
        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
            name: claims.name,
            role,
            permissions: claims.permissions,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        AuthUser::from_claims(claims)
    }
}

/// Optional authentication for endpoints whose result shape depends on the
/// viewer's role without requiring a session (e.g. search, where elevated
/// viewers see unapproved entries).
///
/// A missing header yields an anonymous viewer; a header that is present but
/// invalid is still rejected.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn role(&self) -> Option<Role> {
        self.0.as_ref().map(|u| u.role)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get("Authorization").is_none() {
            return Ok(MaybeAuthUser(None));
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthUser(Some(user)))
    }
}
