use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};

use bazaar_identity::claims::{ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP, validate_token};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::MarketServiceError;
use crate::password::verify_password;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(user: &User, secret: &str, ttl_secs: u64) -> Result<String, MarketServiceError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role.as_u8(),
        exp: now_secs() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| MarketServiceError::Internal(e.into()))
}

pub fn issue_access_token(user: &User, secret: &str) -> Result<String, MarketServiceError> {
    sign(user, secret, ACCESS_TOKEN_EXP)
}

pub fn issue_refresh_token(user: &User, secret: &str) -> Result<String, MarketServiceError> {
    sign(user, secret, REFRESH_TOKEN_EXP)
}

/// Freshly signed access + refresh token pair.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn issue_pair(user: &User, secret: &str) -> Result<TokenPair, MarketServiceError> {
    Ok(TokenPair {
        access_token: issue_access_token(user, secret)?,
        refresh_token: issue_refresh_token(user, secret)?,
    })
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<TokenPair, MarketServiceError> {
        let email = input
            .email
            .filter(|e| !e.is_empty())
            .ok_or(MarketServiceError::MissingEmail)?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(MarketServiceError::MissingPassword)?;

        // Unknown email, wrong password and unconfirmed accounts all
        // fail the same way, so the response does not reveal which.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(MarketServiceError::InvalidCredentials)?;
        if !verify_password(&password, &user.password_hash)? {
            return Err(MarketServiceError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(MarketServiceError::InvalidCredentials);
        }

        issue_pair(&user, &self.jwt_secret)
    }
}

// ── RefreshSession ───────────────────────────────────────────────────────────

pub struct RefreshSessionUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshSessionUseCase<U> {
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, MarketServiceError> {
        let info = validate_token(refresh_token, &self.jwt_secret)
            .map_err(|_| MarketServiceError::InvalidCredentials)?;

        // Re-check the account: a deleted or deactivated user must not
        // be able to mint new tokens from an old refresh token.
        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(MarketServiceError::InvalidCredentials)?;
        if !user.is_active {
            return Err(MarketServiceError::InvalidCredentials);
        }

        issue_pair(&user, &self.jwt_secret)
    }
}
