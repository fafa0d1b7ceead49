//! Authentication extractors.
//!
//! Clients authenticate with `Authorization: Bearer <token>`. Tokens are
//! verified with the [`TokenService`](crate::services::token::TokenService)
//! held in [`AppState`].

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::services::token::Claims;
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// Rejects with a 401 problem response otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(claims): RequireUser) -> String {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub Claims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(Self(claims))
    }
}

/// Extractor that optionally gets the authenticated user.
///
/// A missing, malformed or expired token counts as anonymous.
#[derive(Debug, Clone, Default)]
pub struct OptionalUser(pub Option<Claims>);

impl OptionalUser {
    /// The authenticated user name, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.0.as_ref().map(|claims| claims.sub.as_str())
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(&parts.headers).and_then(|t| state.tokens().verify(t).ok());
        Ok(Self(claims))
    }
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    use super::*;
    use crate::state::test_support;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/account/currentUser");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, "bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, "Basic Ym9iOnBhc3M=".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_require_user_accepts_valid_token() {
        let state = test_support::state();
        let token = state.tokens().issue(&test_support::bob()).unwrap();

        let mut parts = parts(Some(&format!("Bearer {token}")));
        let RequireUser(claims) = RequireUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(claims.sub, "bob");
    }

    #[tokio::test]
    async fn test_require_user_rejects_missing_and_invalid() {
        let state = test_support::state();

        for header in [None, Some("Bearer not-a-token")] {
            let mut parts = parts(header);
            let err = RequireUser::from_request_parts(&mut parts, &state)
                .await
                .unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_optional_user_treats_bad_token_as_anonymous() {
        let state = test_support::state();
        let mut parts = parts(Some("Bearer not-a-token"));
        let user = OptionalUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.user_name(), None);
    }
}
