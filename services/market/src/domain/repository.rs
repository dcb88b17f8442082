#![allow(async_fn_in_trait)]

use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;

use crate::domain::types::{
    AccountToken, Listing, ListingFilter, ListingSortBy, OutboundEmail, ProfilePatch, Review,
    TokenPurpose, User,
};
use crate::error::MarketServiceError;

/// Repository for marketplace accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MarketServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketServiceError>;
    async fn create(&self, user: &User) -> Result<(), MarketServiceError>;
    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<(), MarketServiceError>;
    async fn set_active(&self, id: Uuid) -> Result<(), MarketServiceError>;
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), MarketServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError>;
}

/// Repository for listings.
pub trait ListingRepository: Send + Sync {
    async fn list(
        &self,
        filter: &ListingFilter,
        sort_by: ListingSortBy,
        page: PageRequest,
    ) -> Result<Vec<Listing>, MarketServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, MarketServiceError>;
    /// True if a listing other than `exclude` carries the identical
    /// (title, description, price) triple.
    async fn exists_duplicate(
        &self,
        title: &str,
        description: Option<&str>,
        price: i64,
        exclude: Option<Uuid>,
    ) -> Result<bool, MarketServiceError>;
    async fn create(&self, listing: &Listing) -> Result<(), MarketServiceError>;
    async fn update(&self, listing: &Listing) -> Result<(), MarketServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError>;
}

/// Repository for reviews.
pub trait ReviewRepository: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Vec<Review>, MarketServiceError>;
    /// Every review on one listing, newest first, unpaginated.
    async fn list_by_listing(&self, listing_id: Uuid) -> Result<Vec<Review>, MarketServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, MarketServiceError>;
    async fn create(&self, review: &Review) -> Result<(), MarketServiceError>;
    async fn update(&self, review: &Review) -> Result<(), MarketServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError>;
    /// Ratings of every review on the given listing.
    async fn ratings_by_listing(&self, listing_id: Uuid) -> Result<Vec<u8>, MarketServiceError>;
    /// Ratings of every review across all listings owned by `owner_id`.
    async fn ratings_by_listing_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<u8>, MarketServiceError>;
}

/// Repository for single-use account tokens.
pub trait AccountTokenRepository: Send + Sync {
    async fn create(&self, token: &AccountToken) -> Result<(), MarketServiceError>;
    /// Look up an unused, unexpired token by value and purpose.
    async fn find_valid(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError>;
    /// Same as [`find_valid`](Self::find_valid) but additionally bound to
    /// one user, for links that carry the user id alongside the token.
    async fn find_valid_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError>;
    async fn mark_used(&self, id: Uuid) -> Result<(), MarketServiceError>;
}

/// Port for outbound mail. Delivery happens inline with the request that
/// triggered it; a transport failure fails that request.
pub trait MailerPort: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MarketServiceError>;
}
