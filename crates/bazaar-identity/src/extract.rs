//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::StatusCode;
use axum::http::request::Parts;
use uuid::Uuid;

use bazaar_domain::role::Role;

use crate::claims::validate_token;

/// JWT signing secret, pulled out of app state via `FromRef`.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Caller identity taken from the `Authorization: Bearer` header.
///
/// The required form rejects with a bare 401 when the header is absent,
/// carries another scheme, or the JWT fails validation. Ownership and
/// role checks (403) happen later, in the usecases.
///
/// `Option<Identity>` treats a missing header as an anonymous caller
/// while a present-but-invalid token still rejects, so a client with a
/// stale token hears 401 instead of being silently downgraded.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

fn bearer_value(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn identity_from(token: &str, secret: &str) -> Result<Identity, StatusCode> {
    let info = validate_token(token, secret).map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(Identity {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let token = bearer_value(parts);
        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            identity_from(&token, &secret.0)
        }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let token = bearer_value(parts);
        async move {
            match token {
                None => Ok(None),
                Some(token) => identity_from(&token, &secret.0).map(Some),
            }
        }
    }
}
