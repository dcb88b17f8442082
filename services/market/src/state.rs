use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use bazaar_identity::extract::JwtSecret;

use crate::domain::types::ForbiddenWords;
use crate::infra::db::{
    DbAccountTokenRepository, DbListingRepository, DbReviewRepository, DbUserRepository,
};
use crate::infra::mailer::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub public_base_url: String,
    pub mailer: HttpMailer,
    pub forbidden_words: Arc<ForbiddenWords>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn listing_repo(&self) -> DbListingRepository {
        DbListingRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_token_repo(&self) -> DbAccountTokenRepository {
        DbAccountTokenRepository {
            db: self.db.clone(),
        }
    }
}

// Lets the bearer-token extractor pull the signing secret out of state.
impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}
