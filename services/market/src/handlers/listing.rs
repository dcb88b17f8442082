use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_identity::extract::Identity;

use crate::error::MarketServiceError;
use crate::handlers::caller_of;
use crate::handlers::review::ReviewResponse;
use crate::state::AppState;
use crate::usecase::listing::{
    CreateListingInput, CreateListingUseCase, DeleteListingUseCase, GetListingUseCase,
    ListListingsUseCase, RatedListing, UpdateListingInput, UpdateListingUseCase,
};

use crate::domain::types::{ListingFilter, ListingSortBy};

#[derive(Serialize)]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: String,
    pub average_rating: f64,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RatedListing> for ListingResponse {
    fn from(rated: RatedListing) -> Self {
        let listing = rated.listing;
        Self {
            id: listing.id.to_string(),
            title: listing.title,
            price: listing.price,
            description: listing.description,
            image_url: listing.image_url,
            owner_id: listing.owner_id.to_string(),
            average_rating: rated.average_rating,
            created_at: listing.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ListingDetailResponse {
    pub id: String,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: String,
    pub average_rating: f64,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub reviews: Vec<ReviewResponse>,
}

// ── GET /listings ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListListingsQuery {
    pub page: Option<u64>,
    pub title: Option<String>,
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: Option<NaiveDate>,
    pub ordering: Option<String>,
}

pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListListingsQuery>,
) -> Result<Json<Vec<ListingResponse>>, MarketServiceError> {
    let filter = ListingFilter {
        title: query.title,
        search: query.search,
        owner_id: query.owner_id,
        created_on: query.created_at,
    };
    // Unrecognized ordering values fall back to newest-first.
    let sort_by = query
        .ordering
        .as_deref()
        .and_then(ListingSortBy::from_query)
        .unwrap_or_default();
    let page = PageRequest {
        page: query.page.unwrap_or(1),
    };

    let usecase = ListListingsUseCase {
        listings: state.listing_repo(),
        reviews: state.review_repo(),
    };
    let rated = usecase.execute(&filter, sort_by, page).await?;
    Ok(Json(rated.into_iter().map(ListingResponse::from).collect()))
}

// ── POST /listings ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub async fn create_listing(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), MarketServiceError> {
    let usecase = CreateListingUseCase {
        listings: state.listing_repo(),
        forbidden_words: state.forbidden_words.clone(),
    };
    let rated = usecase
        .execute(
            caller_of(identity),
            CreateListingInput {
                title: body.title,
                price: body.price,
                description: body.description,
                image_url: body.image_url,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ListingResponse::from(rated))))
}

// ── GET /listings/{id} ───────────────────────────────────────────────────────

pub async fn get_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingDetailResponse>, MarketServiceError> {
    let usecase = GetListingUseCase {
        listings: state.listing_repo(),
        reviews: state.review_repo(),
    };
    let detail = usecase.execute(caller_of(identity), id).await?;
    let listing = detail.listing.listing;
    Ok(Json(ListingDetailResponse {
        id: listing.id.to_string(),
        title: listing.title,
        price: listing.price,
        description: listing.description,
        image_url: listing.image_url,
        owner_id: listing.owner_id.to_string(),
        average_rating: detail.listing.average_rating,
        created_at: listing.created_at,
        reviews: detail
            .reviews
            .into_iter()
            .map(ReviewResponse::from)
            .collect(),
    }))
}

// ── PUT/PATCH /listings/{id} ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub async fn update_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<ListingResponse>, MarketServiceError> {
    let usecase = UpdateListingUseCase {
        listings: state.listing_repo(),
        reviews: state.review_repo(),
        forbidden_words: state.forbidden_words.clone(),
    };
    let rated = usecase
        .execute(
            caller_of(identity),
            id,
            UpdateListingInput {
                title: body.title,
                price: body.price,
                description: body.description,
                image_url: body.image_url,
            },
        )
        .await?;
    Ok(Json(ListingResponse::from(rated)))
}

// ── DELETE /listings/{id} ────────────────────────────────────────────────────

pub async fn delete_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketServiceError> {
    let usecase = DeleteListingUseCase {
        listings: state.listing_repo(),
    };
    usecase.execute(caller_of(identity), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
