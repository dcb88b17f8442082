use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Market service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("listing not found")]
    ListingNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("token not found")]
    TokenNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("price must be positive")]
    PriceNotPositive,
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("text contains a forbidden word")]
    ForbiddenWord,
    #[error("an identical listing already exists")]
    DuplicateListing,
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("reset link is invalid or expired")]
    ResetLinkInvalid,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MarketServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ListingNotFound => "LISTING_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::PriceNotPositive => "PRICE_NOT_POSITIVE",
            Self::RatingOutOfRange => "RATING_OUT_OF_RANGE",
            Self::ForbiddenWord => "FORBIDDEN_WORD",
            Self::DuplicateListing => "DUPLICATE_LISTING",
            Self::MissingEmail => "MISSING_EMAIL",
            Self::MissingPassword => "MISSING_PASSWORD",
            Self::ResetLinkInvalid => "RESET_LINK_INVALID",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Request field a validation error refers to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::PriceNotPositive => Some("price"),
            Self::RatingOutOfRange => Some("rating"),
            Self::MissingEmail => Some("email"),
            Self::MissingPassword => Some("password"),
            _ => None,
        }
    }
}

impl IntoResponse for MarketServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::ListingNotFound
            | Self::ReviewNotFound
            | Self::TokenNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::PriceNotPositive
            | Self::RatingOutOfRange
            | Self::ForbiddenWord
            | Self::DuplicateListing
            | Self::MissingEmail
            | Self::MissingPassword
            | Self::ResetLinkInvalid => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(field) = self.field() {
            body["field"] = field.into();
        }
        (status, axum::Json(body)).into_response()
    }
}
