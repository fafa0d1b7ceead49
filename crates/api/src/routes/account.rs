//! Account route handlers: login, registration and the current user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use restore_core::{Basket, BuyerId};

use crate::db::BasketRepository;
use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{BuyerCookie, BuyerCookieUpdate, RequireUser};
use crate::models::{BasketDto, LoginRequest, RegisterRequest, User, UserDto};
use crate::services::{AuthService, BasketService};
use crate::state::AppState;

fn buyer_id_for(user: &User) -> Result<BuyerId> {
    BuyerId::parse(&user.user_name)
        .map_err(|e| AppError::Internal(format!("user {} has no usable name: {e}", user.id)))
}

fn user_dto(user: &User, token: String, basket: Option<&Basket>) -> UserDto {
    UserDto {
        email: user.email.to_string(),
        token,
        basket: basket.map(BasketDto::from),
    }
}

/// `POST /api/account/login`
///
/// Verifies the password, adopts the anonymous basket from the `buyerId`
/// cookie (if any) and returns a fresh token with the resulting basket.
#[instrument(skip(state, cookie, body), fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    cookie: BuyerCookie,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .login(&body.username, &body.password)
        .await?;

    // Token first: the merge below commits
    let token = state.tokens().issue(&user)?;

    let outcome = BasketService::new(state.pool())
        .merge_on_login(
            &buyer_id_for(&user)?,
            cookie.as_deref(),
            state.config().clear_buyer_cookie_on_login,
        )
        .await?;

    set_sentry_user(&user.user_name, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        BuyerCookieUpdate::new(outcome.cookie, state.config().secure_cookies()),
        Json(user_dto(&user, token, outcome.basket.as_ref())),
    )
        .into_response())
}

/// `POST /api/account/register`
///
/// New accounts get the `Member` role. Validation failures are reported
/// together as a 400 problem with an `errors` list.
#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode> {
    let user = AuthService::new(state.pool())
        .register(&body.username, &body.email, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(StatusCode::CREATED)
}

/// `GET /api/account/currentUser`
#[instrument(skip(state, claims), fields(username = %claims.sub))]
pub async fn current_user(
    State(state): State<AppState>,
    RequireUser(claims): RequireUser,
) -> Result<Json<UserDto>> {
    let user = AuthService::new(state.pool()).get_user(&claims.sub).await?;
    let basket = BasketRepository::new(state.pool())
        .get_by_buyer(&buyer_id_for(&user)?)
        .await?;

    let token = state.tokens().issue(&user)?;
    Ok(Json(user_dto(&user, token, basket.as_ref())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use restore_core::{BasketId, BuyerId};

    use super::*;
    use crate::state::test_support::{bob, state};

    #[test]
    fn test_buyer_id_is_the_user_name() {
        assert_eq!(buyer_id_for(&bob()).unwrap().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_login_token_is_signed_for_the_user() {
        let state = state();
        let token = state.tokens().issue(&bob()).unwrap();

        let mut basket = Basket::new(BuyerId::parse("bob").unwrap());
        basket.id = Some(BasketId::new(4));
        let dto = user_dto(&bob(), token, Some(&basket));

        assert_eq!(dto.email, "bob@test.com");
        assert_eq!(state.tokens().verify(&dto.token).unwrap().sub, "bob");
        assert_eq!(dto.basket.map(|b| (b.id, b.buyer_id)), Some((4, "bob".to_string())));
    }

    #[test]
    fn test_user_without_basket_gets_none() {
        assert!(user_dto(&bob(), "t".to_string(), None).basket.is_none());
    }
}
