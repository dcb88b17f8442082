use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::policy::{Action, Resource, authorize};
use bazaar_domain::rating::mean_rating;

use crate::domain::repository::{ListingRepository, ReviewRepository};
use crate::domain::types::{Caller, ForbiddenWords, Listing, ListingFilter, ListingSortBy, Review};
use crate::error::MarketServiceError;
use crate::usecase::ensure;

/// Listing together with its recomputed review average.
#[derive(Debug, Clone)]
pub struct RatedListing {
    pub listing: Listing,
    pub average_rating: f64,
}

async fn rate<R: ReviewRepository>(
    reviews: &R,
    listing: Listing,
) -> Result<RatedListing, MarketServiceError> {
    let ratings = reviews.ratings_by_listing(listing.id).await?;
    Ok(RatedListing {
        listing,
        average_rating: mean_rating(&ratings),
    })
}

// ── ListListings ─────────────────────────────────────────────────────────────

pub struct ListListingsUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    pub listings: L,
    pub reviews: R,
}

impl<L, R> ListListingsUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    /// Public catalog page. The average is recomputed per listing on
    /// every read; nothing is cached.
    pub async fn execute(
        &self,
        filter: &ListingFilter,
        sort_by: ListingSortBy,
        page: PageRequest,
    ) -> Result<Vec<RatedListing>, MarketServiceError> {
        let listings = self.listings.list(filter, sort_by, page).await?;
        let mut rated = Vec::with_capacity(listings.len());
        for listing in listings {
            rated.push(rate(&self.reviews, listing).await?);
        }
        Ok(rated)
    }
}

// ── GetListing ───────────────────────────────────────────────────────────────

pub struct ListingDetail {
    pub listing: RatedListing,
    pub reviews: Vec<Review>,
}

pub struct GetListingUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    pub listings: L,
    pub reviews: R,
}

impl<L, R> GetListingUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        caller: Caller,
        id: Uuid,
    ) -> Result<ListingDetail, MarketServiceError> {
        let listing = self
            .listings
            .find_by_id(id)
            .await?
            .ok_or(MarketServiceError::ListingNotFound)?;
        ensure(authorize(
            Resource::Listing,
            Action::Retrieve,
            Some((caller.role, caller.relation_to(Some(listing.owner_id)))),
        ))?;

        let reviews = self.reviews.list_by_listing(listing.id).await?;
        let listing = rate(&self.reviews, listing).await?;
        Ok(ListingDetail { listing, reviews })
    }
}

// ── CreateListing ────────────────────────────────────────────────────────────

pub struct CreateListingInput {
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub struct CreateListingUseCase<L: ListingRepository> {
    pub listings: L,
    pub forbidden_words: Arc<ForbiddenWords>,
}

impl<L: ListingRepository> CreateListingUseCase<L> {
    pub async fn execute(
        &self,
        caller: Caller,
        input: CreateListingInput,
    ) -> Result<RatedListing, MarketServiceError> {
        ensure(authorize(
            Resource::Listing,
            Action::Create,
            Some((caller.role, caller.relation_to(None))),
        ))?;

        if input.price <= 0 {
            return Err(MarketServiceError::PriceNotPositive);
        }
        if self
            .forbidden_words
            .any_hit([Some(input.title.as_str()), input.description.as_deref()])
        {
            return Err(MarketServiceError::ForbiddenWord);
        }
        if self
            .listings
            .exists_duplicate(&input.title, input.description.as_deref(), input.price, None)
            .await?
        {
            return Err(MarketServiceError::DuplicateListing);
        }

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::now_v7(),
            title: input.title,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            // Owner comes from the session, never from the payload.
            owner_id: caller.user_id,
            created_at: now,
            updated_at: now,
        };
        self.listings.create(&listing).await?;
        Ok(RatedListing {
            listing,
            average_rating: 0.0,
        })
    }
}

// ── UpdateListing ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateListingInput {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub struct UpdateListingUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    pub listings: L,
    pub reviews: R,
    pub forbidden_words: Arc<ForbiddenWords>,
}

impl<L, R> UpdateListingUseCase<L, R>
where
    L: ListingRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        caller: Caller,
        id: Uuid,
        input: UpdateListingInput,
    ) -> Result<RatedListing, MarketServiceError> {
        let mut listing = self
            .listings
            .find_by_id(id)
            .await?
            .ok_or(MarketServiceError::ListingNotFound)?;
        ensure(authorize(
            Resource::Listing,
            Action::Update,
            Some((caller.role, caller.relation_to(Some(listing.owner_id)))),
        ))?;

        // The word check only sees fields present in this payload.
        if self
            .forbidden_words
            .any_hit([input.title.as_deref(), input.description.as_deref()])
        {
            return Err(MarketServiceError::ForbiddenWord);
        }

        if let Some(title) = input.title {
            listing.title = title;
        }
        if let Some(price) = input.price {
            listing.price = price;
        }
        if let Some(description) = input.description {
            listing.description = Some(description);
        }
        if let Some(image_url) = input.image_url {
            listing.image_url = Some(image_url);
        }

        if listing.price <= 0 {
            return Err(MarketServiceError::PriceNotPositive);
        }
        if self
            .listings
            .exists_duplicate(
                &listing.title,
                listing.description.as_deref(),
                listing.price,
                Some(listing.id),
            )
            .await?
        {
            return Err(MarketServiceError::DuplicateListing);
        }

        listing.updated_at = Utc::now();
        self.listings.update(&listing).await?;
        rate(&self.reviews, listing).await
    }
}

// ── DeleteListing ────────────────────────────────────────────────────────────

pub struct DeleteListingUseCase<L: ListingRepository> {
    pub listings: L,
}

impl<L: ListingRepository> DeleteListingUseCase<L> {
    pub async fn execute(&self, caller: Caller, id: Uuid) -> Result<(), MarketServiceError> {
        let listing = self
            .listings
            .find_by_id(id)
            .await?
            .ok_or(MarketServiceError::ListingNotFound)?;
        ensure(authorize(
            Resource::Listing,
            Action::Delete,
            Some((caller.role, caller.relation_to(Some(listing.owner_id)))),
        ))?;

        if !self.listings.delete(id).await? {
            return Err(MarketServiceError::ListingNotFound);
        }
        Ok(())
    }
}
