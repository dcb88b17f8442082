//! JWT claims and validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::role::Role;

/// Access-token JWT lifetime in seconds (4 hours).
pub const ACCESS_TOKEN_EXP: u64 = 14400;

/// Refresh-token JWT lifetime in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604800;

/// JWT claims payload shared by token issuance (login/refresh usecases)
/// and validation (the extractor).
///
/// | Field  | JWT claim | Rust type     | Meaning                    |
/// |--------|-----------|---------------|----------------------------|
/// | `sub`  | `sub`     | UUID string   | user ID                    |
/// | `role` | custom    | `u8` wire val | see [`Role`]               |
/// | `exp`  | `exp`     | seconds       | token expiration (epoch)   |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: u8,
    pub exp: u64,
}

/// Caller identity extracted from a validated token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by [`validate_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Decode and validate a JWT, returning the parsed identity.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s tolerates clock skew against the issuer.
/// A `sub` that is not a UUID or a role outside the known wire values
/// counts as malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    let role = Role::from_u8(data.claims.role).ok_or(AuthError::Malformed)?;

    Ok(TokenInfo {
        user_id,
        role,
        exp: data.claims.exp,
    })
}
