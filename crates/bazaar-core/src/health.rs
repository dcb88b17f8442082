use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Outcome of a service-specific readiness probe.
///
/// Services wire their own `GET /readyz` handler (usually a database
/// ping) and map the result through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl From<Readiness> for StatusCode {
    fn from(readiness: Readiness) -> Self {
        match readiness {
            Readiness::Ready => StatusCode::OK,
            Readiness::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
