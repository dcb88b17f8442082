use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::policy::{Action, Resource, authorize};

use crate::domain::repository::{ListingRepository, ReviewRepository};
use crate::domain::types::{Caller, ForbiddenWords, Review};
use crate::error::MarketServiceError;
use crate::usecase::ensure;

fn check_rating(rating: i16) -> Result<u8, MarketServiceError> {
    if !(1..=5).contains(&rating) {
        return Err(MarketServiceError::RatingOutOfRange);
    }
    Ok(rating as u8)
}

// ── ListReviews ──────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ListReviewsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Review>, MarketServiceError> {
        self.reviews.list(page).await
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub text: String,
    pub rating: i16,
    pub listing_id: Uuid,
}

pub struct CreateReviewUseCase<R, L>
where
    R: ReviewRepository,
    L: ListingRepository,
{
    pub reviews: R,
    pub listings: L,
    pub forbidden_words: Arc<ForbiddenWords>,
}

impl<R, L> CreateReviewUseCase<R, L>
where
    R: ReviewRepository,
    L: ListingRepository,
{
    pub async fn execute(
        &self,
        caller: Caller,
        input: CreateReviewInput,
    ) -> Result<Review, MarketServiceError> {
        ensure(authorize(
            Resource::Review,
            Action::Create,
            Some((caller.role, caller.relation_to(None))),
        ))?;

        let rating = check_rating(input.rating)?;
        if self.forbidden_words.hit(&input.text) {
            return Err(MarketServiceError::ForbiddenWord);
        }
        if self.listings.find_by_id(input.listing_id).await?.is_none() {
            return Err(MarketServiceError::ListingNotFound);
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            text: input.text,
            rating,
            owner_id: Some(caller.user_id),
            listing_id: input.listing_id,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create(&review).await?;
        Ok(review)
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateReviewInput {
    pub text: Option<String>,
    pub rating: Option<i16>,
}

pub struct UpdateReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
    pub forbidden_words: Arc<ForbiddenWords>,
}

impl<R: ReviewRepository> UpdateReviewUseCase<R> {
    pub async fn execute(
        &self,
        caller: Caller,
        id: Uuid,
        input: UpdateReviewInput,
    ) -> Result<Review, MarketServiceError> {
        let mut review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(MarketServiceError::ReviewNotFound)?;
        ensure(authorize(
            Resource::Review,
            Action::Update,
            Some((caller.role, caller.relation_to(review.owner_id))),
        ))?;

        if let Some(rating) = input.rating {
            review.rating = check_rating(rating)?;
        }
        if let Some(text) = input.text {
            if self.forbidden_words.hit(&text) {
                return Err(MarketServiceError::ForbiddenWord);
            }
            review.text = text;
        }

        review.updated_at = Utc::now();
        self.reviews.update(&review).await?;
        Ok(review)
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> DeleteReviewUseCase<R> {
    pub async fn execute(&self, caller: Caller, id: Uuid) -> Result<(), MarketServiceError> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(MarketServiceError::ReviewNotFound)?;
        ensure(authorize(
            Resource::Review,
            Action::Delete,
            Some((caller.role, caller.relation_to(review.owner_id))),
        ))?;

        if !self.reviews.delete(id).await? {
            return Err(MarketServiceError::ReviewNotFound);
        }
        Ok(())
    }
}
