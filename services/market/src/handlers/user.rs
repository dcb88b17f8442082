use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_identity::extract::Identity;

use crate::domain::types::User;
use crate::error::MarketServiceError;
use crate::handlers::caller_of;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteAccountUseCase, GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: u8,
    pub is_active: bool,
    pub average_rating: f64,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ProfileResponse {
    pub fn from_parts(user: User, average_rating: f64) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            avatar_url: user.avatar_url,
            role: user.role.as_u8(),
            is_active: user.is_active,
            average_rating,
            created_at: user.created_at,
        }
    }
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_profile(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, MarketServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
        reviews: state.review_repo(),
    };
    let profile = usecase.execute(caller_of(identity), id).await?;
    Ok(Json(ProfileResponse::from_parts(
        profile.user,
        profile.average_rating,
    )))
}

// ── PATCH /users/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub password: Option<String>,
}

pub async fn update_profile(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, MarketServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
        reviews: state.review_repo(),
    };
    let profile = usecase
        .execute(
            caller_of(identity),
            id,
            UpdateProfileInput {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                avatar_url: body.avatar_url,
                password: body.password,
            },
        )
        .await?;
    Ok(Json(ProfileResponse::from_parts(
        profile.user,
        profile.average_rating,
    )))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_account(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketServiceError> {
    let usecase = DeleteAccountUseCase {
        users: state.user_repo(),
    };
    usecase.execute(caller_of(identity), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
