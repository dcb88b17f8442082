use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use bazaar_domain::pagination::{PageRequest, Sort};
use bazaar_domain::role::Role;

use bazaar_market::domain::repository::{
    AccountTokenRepository, ListingRepository, MailerPort, ReviewRepository, UserRepository,
};
use bazaar_market::domain::types::{
    AccountToken, Caller, ForbiddenWords, Listing, ListingFilter, ListingSortBy, OutboundEmail,
    ProfilePatch, Review, TokenPurpose, User,
};
use bazaar_market::error::MarketServiceError;
use bazaar_market::password::hash_password;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests";
pub const TEST_PASSWORD: &str = "Qwerty123";

pub fn forbidden() -> Arc<ForbiddenWords> {
    Arc::new(ForbiddenWords::parse("casino\njackpot\nfree money"))
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the rows for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MarketServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), MarketServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<(), MarketServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(v) = &patch.first_name {
                user.first_name = v.clone();
            }
            if let Some(v) = &patch.last_name {
                user.last_name = v.clone();
            }
            if let Some(v) = &patch.phone {
                user.phone = Some(v.clone());
            }
            if let Some(v) = &patch.avatar_url {
                user.avatar_url = Some(v.clone());
            }
            if let Some(v) = &patch.password_hash {
                user.password_hash = v.clone();
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid) -> Result<(), MarketServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.is_active = true;
        }
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), MarketServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockListingRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockListingRepo {
    pub listings: Arc<Mutex<Vec<Listing>>>,
}

impl MockListingRepo {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Arc::new(Mutex::new(listings)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn listings_handle(&self) -> Arc<Mutex<Vec<Listing>>> {
        Arc::clone(&self.listings)
    }
}

impl ListingRepository for MockListingRepo {
    async fn list(
        &self,
        filter: &ListingFilter,
        sort_by: ListingSortBy,
        page: PageRequest,
    ) -> Result<Vec<Listing>, MarketServiceError> {
        let page = page.clamped();
        let mut rows: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| match &filter.title {
                Some(title) => l.title.to_lowercase() == title.to_lowercase(),
                None => true,
            })
            .filter(|l| match &filter.search {
                Some(search) => l.title.to_lowercase().contains(&search.to_lowercase()),
                None => true,
            })
            .filter(|l| match filter.owner_id {
                Some(owner_id) => l.owner_id == owner_id,
                None => true,
            })
            .filter(|l| match filter.created_on {
                Some(day) => l.created_at.date_naive() == day,
                None => true,
            })
            .cloned()
            .collect();
        match sort_by {
            ListingSortBy::CreatedAt(Sort::Desc) => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            ListingSortBy::CreatedAt(Sort::Asc) => {
                rows.sort_by(|a, b| a.created_at.cmp(&b.created_at))
            }
        }
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, MarketServiceError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn exists_duplicate(
        &self,
        title: &str,
        description: Option<&str>,
        price: i64,
        exclude: Option<Uuid>,
    ) -> Result<bool, MarketServiceError> {
        Ok(self.listings.lock().unwrap().iter().any(|l| {
            Some(l.id) != exclude
                && l.title == title
                && l.description.as_deref() == description
                && l.price == price
        }))
    }

    async fn create(&self, listing: &Listing) -> Result<(), MarketServiceError> {
        self.listings.lock().unwrap().push(listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &Listing) -> Result<(), MarketServiceError> {
        let mut listings = self.listings.lock().unwrap();
        if let Some(row) = listings.iter_mut().find(|l| l.id == listing.id) {
            *row = listing.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let mut listings = self.listings.lock().unwrap();
        let before = listings.len();
        listings.retain(|l| l.id != id);
        Ok(listings.len() < before)
    }
}

// ── MockReviewRepo ───────────────────────────────────────────────────────────

/// Review store that shares the listing rows so the owner aggregate can
/// resolve which listings belong to whom.
#[derive(Clone)]
pub struct MockReviewRepo {
    pub reviews: Arc<Mutex<Vec<Review>>>,
    pub listings: Arc<Mutex<Vec<Listing>>>,
}

impl MockReviewRepo {
    pub fn new(reviews: Vec<Review>, listings: Arc<Mutex<Vec<Listing>>>) -> Self {
        Self {
            reviews: Arc::new(Mutex::new(reviews)),
            listings,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], Arc::new(Mutex::new(vec![])))
    }

    pub fn reviews_handle(&self) -> Arc<Mutex<Vec<Review>>> {
        Arc::clone(&self.reviews)
    }
}

impl ReviewRepository for MockReviewRepo {
    async fn list(&self, page: PageRequest) -> Result<Vec<Review>, MarketServiceError> {
        let page = page.clamped();
        let mut rows = self.reviews.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn list_by_listing(&self, listing_id: Uuid) -> Result<Vec<Review>, MarketServiceError> {
        let mut rows: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.listing_id == listing_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, MarketServiceError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create(&self, review: &Review) -> Result<(), MarketServiceError> {
        self.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), MarketServiceError> {
        let mut reviews = self.reviews.lock().unwrap();
        if let Some(row) = reviews.iter_mut().find(|r| r.id == review.id) {
            *row = review.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }

    async fn ratings_by_listing(&self, listing_id: Uuid) -> Result<Vec<u8>, MarketServiceError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.listing_id == listing_id)
            .map(|r| r.rating)
            .collect())
    }

    async fn ratings_by_listing_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<u8>, MarketServiceError> {
        let owned: Vec<Uuid> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .map(|l| l.id)
            .collect();
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| owned.contains(&r.listing_id))
            .map(|r| r.rating)
            .collect())
    }
}

// ── MockTokenRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockTokenRepo {
    pub tokens: Arc<Mutex<Vec<AccountToken>>>,
}

impl MockTokenRepo {
    pub fn empty() -> Self {
        Self {
            tokens: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn tokens_handle(&self) -> Arc<Mutex<Vec<AccountToken>>> {
        Arc::clone(&self.tokens)
    }
}

impl AccountTokenRepository for MockTokenRepo {
    async fn create(&self, token: &AccountToken) -> Result<(), MarketServiceError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token && t.purpose == purpose && t.is_valid())
            .cloned())
    }

    async fn find_valid_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| {
                t.user_id == user_id && t.token == token && t.purpose == purpose && t.is_valid()
            })
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), MarketServiceError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.id == id) {
            token.used_at = Some(Utc::now());
        }
        Ok(())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<OutboundEmail>>> {
        Arc::clone(&self.sent)
    }
}

impl MailerPort for MockMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MarketServiceError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn active_user(email: &str) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        first_name: "Mara".to_owned(),
        last_name: "Lindqvist".to_owned(),
        phone: None,
        avatar_url: None,
        role: Role::User,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn moderator_user(email: &str) -> User {
    let mut user = active_user(email);
    user.role = Role::Moderator;
    user
}

pub fn caller_for(user: &User) -> Caller {
    Caller {
        user_id: user.id,
        role: user.role,
    }
}

/// Listing created `age_minutes` ago, to make ordering deterministic.
pub fn test_listing(owner_id: Uuid, title: &str, price: i64, age_minutes: i64) -> Listing {
    let at = Utc::now() - Duration::minutes(age_minutes);
    Listing {
        id: Uuid::now_v7(),
        title: title.to_owned(),
        price,
        description: Some(format!("{title} in good condition")),
        image_url: None,
        owner_id,
        created_at: at,
        updated_at: at,
    }
}

pub fn test_review(owner_id: Option<Uuid>, listing_id: Uuid, rating: u8) -> Review {
    Review {
        id: Uuid::now_v7(),
        text: "does what it says".to_owned(),
        rating,
        owner_id,
        listing_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
