use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use bazaar_core::health::{Readiness, healthz};
use bazaar_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{confirm_email, register, reset_password_confirm, reset_password_request},
    listing::{create_listing, delete_listing, get_listing, list_listings, update_listing},
    review::{create_review, delete_review, list_reviews, update_review},
    token::{login, refresh_token},
    user::{delete_account, get_profile, update_profile},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    let readiness = match state.db.ping().await {
        Ok(()) => Readiness::Ready,
        Err(_) => Readiness::NotReady,
    };
    readiness.into()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account lifecycle
        .route("/users", post(register))
        .route("/users/email-confirm/{token}", get(confirm_email))
        .route("/users/reset-password", post(reset_password_request))
        .route(
            "/users/reset-password-confirm/{user_id}/{token}",
            post(reset_password_confirm),
        )
        // Sessions
        .route("/auth/token", post(login))
        .route("/auth/token", patch(refresh_token))
        // Profiles
        .route("/users/{id}", get(get_profile))
        .route("/users/{id}", patch(update_profile))
        .route("/users/{id}", delete(delete_account))
        // Listings
        .route("/listings", get(list_listings))
        .route("/listings", post(create_listing))
        .route("/listings/{id}", get(get_listing))
        .route("/listings/{id}", put(update_listing))
        .route("/listings/{id}", patch(update_listing))
        .route("/listings/{id}", delete(delete_listing))
        // Reviews
        .route("/reviews", get(list_reviews))
        .route("/reviews", post(create_review))
        .route("/reviews/{id}", put(update_review))
        .route("/reviews/{id}", patch(update_review))
        .route("/reviews/{id}", delete(delete_review))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
