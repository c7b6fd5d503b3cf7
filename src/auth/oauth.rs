use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Router,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use tracing::{error, info, instrument};
use url::Url;

use crate::auth::handlers::store_error;
use crate::auth::jwt::{Guest, JwtKeys};
use crate::state::AppState;
use crate::users::store::UserStore;
use crate::users::types::OAuthIdentity;

pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/oauth", get(oauth_start))
        .route("/auth/oauth/callback", get(oauth_callback))
}

/// Provider redirect query. The `state` nonce is accepted but not round-trip
/// verified; extra query keys are ignored by the extractor.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Shape of an OIDC userinfo reply; only the fields the account layer needs.
#[derive(Debug, Deserialize)]
struct ProviderUser {
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

fn provider_error<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> (StatusCode, String) {
    move |e| {
        error!(error = %e, stage, "oauth provider call failed");
        (StatusCode::BAD_GATEWAY, "OAuth provider error".to_string())
    }
}

#[instrument(skip(state))]
pub async fn oauth_start(
    State(state): State<AppState>,
    _guest: Guest,
) -> Result<Redirect, (StatusCode, String)> {
    let cfg = &state.config.oauth;
    if cfg.client_id.is_empty() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "OAuth is not configured".into(),
        ));
    }

    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    let mut url = Url::parse(&cfg.authorize_url).map_err(|e| {
        error!(error = %e, "bad authorize url");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })?;
    url.query_pairs_mut()
        .append_pair("client_id", &cfg.client_id)
        .append_pair("redirect_uri", &cfg.redirect_url)
        .append_pair("response_type", "code")
        .append_pair("scope", &cfg.scopes)
        .append_pair("state", &nonce);

    Ok(Redirect::temporary(url.as_str()))
}

#[instrument(skip(state, query))]
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, (StatusCode, String)> {
    let cfg = &state.config.oauth;

    let token: TokenResponse = state
        .http
        .post(&cfg.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", query.code.as_str()),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("redirect_uri", cfg.redirect_url.as_str()),
        ])
        .send()
        .await
        .map_err(provider_error("token"))?
        .error_for_status()
        .map_err(provider_error("token"))?
        .json()
        .await
        .map_err(provider_error("token"))?;

    let profile: ProviderUser = state
        .http
        .get(&cfg.userinfo_url)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(provider_error("userinfo"))?
        .error_for_status()
        .map_err(provider_error("userinfo"))?
        .json()
        .await
        .map_err(provider_error("userinfo"))?;

    let user = state
        .store
        .create_or_link_oauth(&OAuthIdentity {
            external_id: profile.sub,
            email: profile.email.trim().to_lowercase(),
            name: profile.name,
            avatar_url: profile.picture,
        })
        .await
        .map_err(store_error)?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    })?;

    info!(user_id = %user.id, "oauth login");
    Ok(Redirect::temporary(&format!(
        "{}/auth/callback#access_token={}&refresh_token={}",
        state.config.frontend_url, access_token, refresh_token
    )))
}
