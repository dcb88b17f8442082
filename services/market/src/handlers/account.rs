use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MarketServiceError;
use crate::handlers::user::ProfileResponse;
use crate::state::AppState;
use crate::usecase::account::{
    ConfirmEmailUseCase, ConfirmPasswordResetInput, ConfirmPasswordResetUseCase, RegisterInput,
    RegisterUseCase, RequestPasswordResetInput, RequestPasswordResetUseCase,
};

/// Body for the account-flow endpoints that only acknowledge.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), MarketServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        tokens: state.account_token_repo(),
        mailer: state.mailer.clone(),
        public_base_url: state.public_base_url.clone(),
    };
    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            avatar_url: body.avatar_url,
        })
        .await?;
    // A fresh account has no listings, so no ratings either.
    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::from_parts(user, 0.0)),
    ))
}

// ── GET /users/email-confirm/{token} ─────────────────────────────────────────

pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, MarketServiceError> {
    let usecase = ConfirmEmailUseCase {
        users: state.user_repo(),
        tokens: state.account_token_repo(),
    };
    usecase.execute(&token).await?;
    Ok(Json(MessageResponse {
        message: "email confirmed",
    }))
}

// ── POST /users/reset-password ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
}

pub async fn reset_password_request(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, MarketServiceError> {
    let usecase = RequestPasswordResetUseCase {
        users: state.user_repo(),
        tokens: state.account_token_repo(),
        mailer: state.mailer.clone(),
        public_base_url: state.public_base_url.clone(),
    };
    usecase
        .execute(RequestPasswordResetInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: "reset link sent",
    }))
}

// ── POST /users/reset-password-confirm/{user_id}/{token} ─────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordConfirmRequest {
    pub password: Option<String>,
}

pub async fn reset_password_confirm(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
    Json(body): Json<ResetPasswordConfirmRequest>,
) -> Result<Json<MessageResponse>, MarketServiceError> {
    let usecase = ConfirmPasswordResetUseCase {
        users: state.user_repo(),
        tokens: state.account_token_repo(),
    };
    usecase
        .execute(ConfirmPasswordResetInput {
            user_id,
            token,
            password: body.password,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "password updated",
    }))
}
