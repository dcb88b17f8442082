use anyhow::Context as _;
use chrono::{Duration, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func, extension::postgres::PgExpr},
};
use uuid::Uuid;

use bazaar_domain::pagination::{PageRequest, Sort};
use bazaar_domain::role::Role;
use bazaar_market_schema::{account_tokens, listings, reviews, users};

use crate::domain::repository::{
    AccountTokenRepository, ListingRepository, ReviewRepository, UserRepository,
};
use crate::domain::types::{
    AccountToken, Listing, ListingFilter, ListingSortBy, ProfilePatch, Review, TokenPurpose, User,
};
use crate::error::MarketServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MarketServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, MarketServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), MarketServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            phone: Set(user.phone.clone()),
            avatar_url: Set(user.avatar_url.clone()),
            role: Set(user.role.as_u8() as i16),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<(), MarketServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(first_name) = &patch.first_name {
            am.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            am.last_name = Set(last_name.clone());
        }
        if let Some(phone) = &patch.phone {
            am.phone = Set(Some(phone.clone()));
        }
        if let Some(avatar_url) = &patch.avatar_url {
            am.avatar_url = Set(Some(avatar_url.clone()));
        }
        if let Some(password_hash) = &patch.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update user profile")?;
        Ok(())
    }

    async fn set_active(&self, id: Uuid) -> Result<(), MarketServiceError> {
        users::ActiveModel {
            id: Set(id),
            is_active: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("activate user")?;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), MarketServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user password hash")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        avatar_url: model.avatar_url,
        // Unknown role values demote to plain user.
        role: Role::from_u8(model.role as u8).unwrap_or(Role::User),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Listing repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbListingRepository {
    pub db: DatabaseConnection,
}

impl ListingRepository for DbListingRepository {
    async fn list(
        &self,
        filter: &ListingFilter,
        sort_by: ListingSortBy,
        page: PageRequest,
    ) -> Result<Vec<Listing>, MarketServiceError> {
        let page = page.clamped();
        let mut query = listings::Entity::find();
        if let Some(title) = &filter.title {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((
                    listings::Entity,
                    listings::Column::Title,
                ))))
                .eq(title.to_lowercase()),
            );
        }
        if let Some(search) = &filter.search {
            query = query.filter(
                Expr::col((listings::Entity, listings::Column::Title))
                    .ilike(format!("%{search}%")),
            );
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(listings::Column::OwnerId.eq(owner_id));
        }
        if let Some(day) = filter.created_on {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            let end = start + Duration::days(1);
            query = query
                .filter(listings::Column::CreatedAt.gte(start))
                .filter(listings::Column::CreatedAt.lt(end));
        }
        query = match sort_by {
            ListingSortBy::CreatedAt(Sort::Desc) => {
                query.order_by_desc(listings::Column::CreatedAt)
            }
            ListingSortBy::CreatedAt(Sort::Asc) => query.order_by_asc(listings::Column::CreatedAt),
        };
        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list listings")?;
        Ok(models.into_iter().map(listing_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, MarketServiceError> {
        let model = listings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find listing by id")?;
        Ok(model.map(listing_from_model))
    }

    async fn exists_duplicate(
        &self,
        title: &str,
        description: Option<&str>,
        price: i64,
        exclude: Option<Uuid>,
    ) -> Result<bool, MarketServiceError> {
        let mut query = listings::Entity::find()
            .filter(listings::Column::Title.eq(title))
            .filter(listings::Column::Price.eq(price));
        query = match description {
            Some(description) => query.filter(listings::Column::Description.eq(description)),
            None => query.filter(listings::Column::Description.is_null()),
        };
        if let Some(exclude) = exclude {
            query = query.filter(listings::Column::Id.ne(exclude));
        }
        let count = query
            .count(&self.db)
            .await
            .context("count duplicate listings")?;
        Ok(count > 0)
    }

    async fn create(&self, listing: &Listing) -> Result<(), MarketServiceError> {
        listings::ActiveModel {
            id: Set(listing.id),
            title: Set(listing.title.clone()),
            price: Set(listing.price),
            description: Set(listing.description.clone()),
            image_url: Set(listing.image_url.clone()),
            owner_id: Set(listing.owner_id),
            created_at: Set(listing.created_at),
            updated_at: Set(listing.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create listing")?;
        Ok(())
    }

    async fn update(&self, listing: &Listing) -> Result<(), MarketServiceError> {
        listings::ActiveModel {
            id: Set(listing.id),
            title: Set(listing.title.clone()),
            price: Set(listing.price),
            description: Set(listing.description.clone()),
            image_url: Set(listing.image_url.clone()),
            updated_at: Set(listing.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update listing")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let result = listings::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete listing")?;
        Ok(result.rows_affected > 0)
    }
}

fn listing_from_model(model: listings::Model) -> Listing {
    Listing {
        id: model.id,
        title: model.title,
        price: model.price,
        description: model.description,
        image_url: model.image_url,
        owner_id: model.owner_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list(&self, page: PageRequest) -> Result<Vec<Review>, MarketServiceError> {
        let page = page.clamped();
        let models = reviews::Entity::find()
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list reviews")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn list_by_listing(&self, listing_id: Uuid) -> Result<Vec<Review>, MarketServiceError> {
        let models = reviews::Entity::find()
            .filter(reviews::Column::ListingId.eq(listing_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list reviews by listing")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, MarketServiceError> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(model.map(review_from_model))
    }

    async fn create(&self, review: &Review) -> Result<(), MarketServiceError> {
        reviews::ActiveModel {
            id: Set(review.id),
            text: Set(review.text.clone()),
            rating: Set(review.rating as i16),
            owner_id: Set(review.owner_id),
            listing_id: Set(review.listing_id),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create review")?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), MarketServiceError> {
        reviews::ActiveModel {
            id: Set(review.id),
            text: Set(review.text.clone()),
            rating: Set(review.rating as i16),
            updated_at: Set(review.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update review")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MarketServiceError> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }

    async fn ratings_by_listing(&self, listing_id: Uuid) -> Result<Vec<u8>, MarketServiceError> {
        let ratings: Vec<i16> = reviews::Entity::find()
            .filter(reviews::Column::ListingId.eq(listing_id))
            .select_only()
            .column(reviews::Column::Rating)
            .into_tuple()
            .all(&self.db)
            .await
            .context("ratings by listing")?;
        Ok(ratings.into_iter().map(|r| r as u8).collect())
    }

    async fn ratings_by_listing_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<u8>, MarketServiceError> {
        let ratings: Vec<i16> = reviews::Entity::find()
            .join(JoinType::InnerJoin, reviews::Relation::Listing.def())
            .filter(listings::Column::OwnerId.eq(owner_id))
            .select_only()
            .column(reviews::Column::Rating)
            .into_tuple()
            .all(&self.db)
            .await
            .context("ratings by listing owner")?;
        Ok(ratings.into_iter().map(|r| r as u8).collect())
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        text: model.text,
        rating: model.rating as u8,
        owner_id: model.owner_id,
        listing_id: model.listing_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Account token repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountTokenRepository {
    pub db: DatabaseConnection,
}

impl AccountTokenRepository for DbAccountTokenRepository {
    async fn create(&self, token: &AccountToken) -> Result<(), MarketServiceError> {
        account_tokens::ActiveModel {
            id: Set(token.id),
            user_id: Set(token.user_id),
            token: Set(token.token.clone()),
            purpose: Set(token.purpose.as_i16()),
            expires_at: Set(token.expires_at),
            used_at: Set(None),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("create account token")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError> {
        let now = Utc::now();
        let model = account_tokens::Entity::find()
            .filter(account_tokens::Column::Token.eq(token))
            .filter(account_tokens::Column::Purpose.eq(purpose.as_i16()))
            .filter(account_tokens::Column::UsedAt.is_null())
            .filter(account_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid account token")?;
        Ok(model.map(|m| account_token_from_model(m, purpose)))
    }

    async fn find_valid_for_user(
        &self,
        user_id: Uuid,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Option<AccountToken>, MarketServiceError> {
        let now = Utc::now();
        let model = account_tokens::Entity::find()
            .filter(account_tokens::Column::UserId.eq(user_id))
            .filter(account_tokens::Column::Token.eq(token))
            .filter(account_tokens::Column::Purpose.eq(purpose.as_i16()))
            .filter(account_tokens::Column::UsedAt.is_null())
            .filter(account_tokens::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid account token for user")?;
        Ok(model.map(|m| account_token_from_model(m, purpose)))
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), MarketServiceError> {
        account_tokens::ActiveModel {
            id: Set(id),
            used_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark account token used")?;
        Ok(())
    }
}

// The queries above always filter on `purpose`, so the loaded row's
// purpose is the one that was asked for.
fn account_token_from_model(model: account_tokens::Model, purpose: TokenPurpose) -> AccountToken {
    AccountToken {
        id: model.id,
        user_id: model.user_id,
        token: model.token,
        purpose,
        expires_at: model.expires_at,
        used_at: model.used_at,
        created_at: model.created_at,
    }
}
