//! Bearer token extraction
//!
//! Handlers that require a login take [`AuthUser`]; handlers where a login
//! is optional take `Option<AuthUser>`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::User;

/// The user behind a valid `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pull the token out of an `Authorization` header value
fn bearer_token(value: &str) -> Result<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::unauthorized("Invalid authentication credentials")),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| Error::unauthorized("Not authenticated"))?
            .to_str()
            .map_err(|_| Error::unauthorized("Invalid authentication credentials"))?;

        let token = bearer_token(value)?;
        let user = state.auth().validate_token(token).await?;
        Ok(AuthUser(user))
    }
}
