//! Authentication context utilities.
//!
//! Provides the extractor that resolves a bearer token to a trusted user
//! record. Handlers receive an already-resolved `CurrentUser`; the core
//! never sees a credential.

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::{CurrentUser, EntityId};
use crate::services::jwt_service::JwtService;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Authentication context extracted from request
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user: CurrentUser,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_bearer_token)
            .ok_or_else(|| {
                tracing::warn!("No authorization token provided");
                ApiError::unauthorized("missing_token")
            })?;

        let claims = state.jwt.validate_access_token(token).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::unauthorized("invalid_token")
        })?;

        let user_id = EntityId::parse(&claims.sub)
            .map_err(|_| ApiError::unauthorized("invalid_token"))?;

        let user = state
            .storage
            .get_user(&user_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load user {}: {}", user_id, e);
                ApiError::internal("internal_error")
            })?
            .ok_or_else(|| ApiError::unauthorized("unknown_user"))?;

        if !user.is_active {
            return Err(ApiError::unauthorized("inactive_user"));
        }

        Ok(AuthContext {
            user: CurrentUser::from(&user),
        })
    }
}
