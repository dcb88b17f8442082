use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::MarketServiceError;
use crate::state::AppState;
use crate::usecase::token::{LoginInput, LoginUseCase, RefreshSessionUseCase};

#[derive(Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ── POST /auth/token ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, MarketServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let pair = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

// ── PATCH /auth/token ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, MarketServiceError> {
    let usecase = RefreshSessionUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let pair = usecase.execute(&body.refresh_token).await?;
    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}
