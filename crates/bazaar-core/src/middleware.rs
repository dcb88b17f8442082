use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().unwrap()))
    }
}

/// Stamp each incoming request with a fresh UUID request id.
/// Apply with `.layer(request_id_layer())` in the router.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(
        axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
        MakeUuidRequestId,
    )
}

/// Echo the request id back on the response so callers can correlate.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(axum::http::HeaderName::from_static(REQUEST_ID_HEADER))
}
