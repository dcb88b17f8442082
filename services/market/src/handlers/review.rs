use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_identity::extract::Identity;

use crate::domain::types::Review;
use crate::error::MarketServiceError;
use crate::handlers::caller_of;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, ListReviewsUseCase,
    UpdateReviewInput, UpdateReviewUseCase,
};

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub text: String,
    pub rating: u8,
    pub owner_id: Option<String>,
    pub listing_id: String,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            text: review.text,
            rating: review.rating,
            owner_id: review.owner_id.map(|id| id.to_string()),
            listing_id: review.listing_id.to_string(),
            created_at: review.created_at,
        }
    }
}

// ── GET /reviews ─────────────────────────────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ReviewResponse>>, MarketServiceError> {
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
    };
    let reviews = usecase.execute(page).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// ── POST /reviews ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub rating: i16,
    pub listing_id: Uuid,
}

pub async fn create_review(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), MarketServiceError> {
    let usecase = CreateReviewUseCase {
        reviews: state.review_repo(),
        listings: state.listing_repo(),
        forbidden_words: state.forbidden_words.clone(),
    };
    let review = usecase
        .execute(
            caller_of(identity),
            CreateReviewInput {
                text: body.text,
                rating: body.rating,
                listing_id: body.listing_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

// ── PUT/PATCH /reviews/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub rating: Option<i16>,
}

pub async fn update_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, MarketServiceError> {
    let usecase = UpdateReviewUseCase {
        reviews: state.review_repo(),
        forbidden_words: state.forbidden_words.clone(),
    };
    let review = usecase
        .execute(
            caller_of(identity),
            id,
            UpdateReviewInput {
                text: body.text,
                rating: body.rating,
            },
        )
        .await?;
    Ok(Json(ReviewResponse::from(review)))
}

// ── DELETE /reviews/{id} ─────────────────────────────────────────────────────

pub async fn delete_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketServiceError> {
    let usecase = DeleteReviewUseCase {
        reviews: state.review_repo(),
    };
    usecase.execute(caller_of(identity), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
