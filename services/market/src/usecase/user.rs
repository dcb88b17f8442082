use uuid::Uuid;

use bazaar_domain::policy::{Action, Resource, authorize};
use bazaar_domain::rating::mean_rating;

use crate::domain::repository::{ReviewRepository, UserRepository};
use crate::domain::types::{Caller, ProfilePatch, User};
use crate::error::MarketServiceError;
use crate::password::hash_password;
use crate::usecase::ensure;

/// Profile with the average rating over the user's listings' reviews.
#[derive(Debug)]
pub struct ProfileOutput {
    pub user: User,
    pub average_rating: f64,
}

async fn profile_of<R: ReviewRepository>(
    reviews: &R,
    user: User,
) -> Result<ProfileOutput, MarketServiceError> {
    let ratings = reviews.ratings_by_listing_owner(user.id).await?;
    Ok(ProfileOutput {
        user,
        average_rating: mean_rating(&ratings),
    })
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U, R>
where
    U: UserRepository,
    R: ReviewRepository,
{
    pub users: U,
    pub reviews: R,
}

impl<U, R> GetProfileUseCase<U, R>
where
    U: UserRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        caller: Caller,
        user_id: Uuid,
    ) -> Result<ProfileOutput, MarketServiceError> {
        // The relation comes from the path, so the check runs before
        // the lookup and a stranger cannot probe which ids exist.
        ensure(authorize(
            Resource::Profile,
            Action::Retrieve,
            Some((caller.role, caller.relation_to(Some(user_id)))),
        ))?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(MarketServiceError::UserNotFound)?;
        profile_of(&self.reviews, user).await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub password: Option<String>,
}

pub struct UpdateProfileUseCase<U, R>
where
    U: UserRepository,
    R: ReviewRepository,
{
    pub users: U,
    pub reviews: R,
}

impl<U, R> UpdateProfileUseCase<U, R>
where
    U: UserRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        caller: Caller,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<ProfileOutput, MarketServiceError> {
        ensure(authorize(
            Resource::Profile,
            Action::Update,
            Some((caller.role, caller.relation_to(Some(user_id)))),
        ))?;
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(MarketServiceError::UserNotFound);
        }

        let patch = ProfilePatch {
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            avatar_url: input.avatar_url,
            password_hash: input.password.map(|p| hash_password(&p)).transpose()?,
        };
        // An empty payload is a no-op, not an error.
        if !patch.is_empty() {
            self.users.update_profile(user_id, &patch).await?;
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(MarketServiceError::UserNotFound)?;
        profile_of(&self.reviews, user).await
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteAccountUseCase<U> {
    /// Listings cascade away with the account; reviews stay behind with
    /// their owner cleared. Both are foreign-key behavior.
    pub async fn execute(&self, caller: Caller, user_id: Uuid) -> Result<(), MarketServiceError> {
        ensure(authorize(
            Resource::Profile,
            Action::Delete,
            Some((caller.role, caller.relation_to(Some(user_id)))),
        ))?;
        if !self.users.delete(user_id).await? {
            return Err(MarketServiceError::UserNotFound);
        }
        Ok(())
    }
}
