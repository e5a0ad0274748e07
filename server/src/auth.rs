//! Bearer Identity
//!
//! `Authorization: Bearer <user id>` names the caller. Anything else is 401.
//!
//! This is a development stand-in, not authentication: the token is the user
//! id itself and is never verified, so any caller can act as any user by
//! sending their id. Put a real identity provider in front before exposing
//! the server.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::error::ApiError;

/// Authenticated caller's user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Identity(token.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
