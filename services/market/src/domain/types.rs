use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use bazaar_domain::pagination::Sort;
use bazaar_domain::policy::Relation;
use bazaar_domain::role::Role;

/// Length of a mailed account token (16 bytes of entropy, hex encoded).
pub const TOKEN_LEN: usize = 32;

/// Activation links stay redeemable for a day.
pub const ACTIVATION_TOKEN_TTL_SECS: i64 = 86_400;

/// Reset links are short-lived.
pub const RESET_TOKEN_TTL_SECS: i64 = 3_600;

/// Marketplace account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Classified listing posted by a user.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review attached to a listing.
///
/// `owner_id` goes `None` when the author's account is deleted; the
/// review itself survives.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub text: String,
    pub rating: u8,
    pub owner_id: Option<Uuid>,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a mailed account token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Activation = 0,
    PasswordReset = 1,
}

impl TokenPurpose {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Activation),
            1 => Some(Self::PasswordReset),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Lifetime of a freshly issued token of this purpose.
    pub fn ttl(self) -> Duration {
        match self {
            Self::Activation => Duration::seconds(ACTIVATION_TOKEN_TTL_SECS),
            Self::PasswordReset => Duration::seconds(RESET_TOKEN_TTL_SECS),
        }
    }
}

/// Single-use token mailed to a user.
#[derive(Debug, Clone)]
pub struct AccountToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccountToken {
    /// A token is redeemable while unused and unexpired.
    pub fn is_valid(&self) -> bool {
        self.used_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Authenticated caller as the usecases see it.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    /// Relation of this caller to an object owned by `owner_id`.
    pub fn relation_to(&self, owner_id: Option<Uuid>) -> Relation {
        if owner_id == Some(self.user_id) {
            Relation::Owner
        } else {
            Relation::Other
        }
    }
}

/// Column a listing list is ordered by.
#[derive(Debug, Clone, Copy)]
pub enum ListingSortBy {
    CreatedAt(Sort),
}

impl Default for ListingSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

impl ListingSortBy {
    /// Parse the `ordering` query value (`created_at` or `-created_at`).
    pub fn from_query(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt(Sort::Asc)),
            "-created_at" => Some(Self::CreatedAt(Sort::Desc)),
            _ => None,
        }
    }
}

/// Filters accepted by the listing catalog query.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Case-insensitive exact title match.
    pub title: Option<String>,
    /// Case-insensitive substring match on title.
    pub search: Option<String>,
    pub owner_id: Option<Uuid>,
    /// UTC calendar day the listing was created on.
    pub created_on: Option<chrono::NaiveDate>,
}

/// Profile fields a user may change. Email and role are immutable here.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.avatar_url.is_none()
            && self.password_hash.is_none()
    }
}

/// Message handed to the mailer port.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Deny-list applied to listing titles, listing descriptions and review
/// text. Matching is case-insensitive substring containment.
#[derive(Debug, Default)]
pub struct ForbiddenWords {
    words: Vec<String>,
}

impl ForbiddenWords {
    /// Parse a newline-delimited word list. Blank lines are skipped.
    pub fn parse(raw: &str) -> Self {
        let words = raw
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// True if any forbidden word occurs anywhere in `text`.
    pub fn hit(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        self.words.iter().any(|w| haystack.contains(w.as_str()))
    }

    /// Check every field present in a payload; absent fields are skipped.
    pub fn any_hit<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        fields.into_iter().flatten().any(|f| self.hit(f))
    }
}
