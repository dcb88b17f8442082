use std::fs;
use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use bazaar_core::tracing::init_tracing;
use bazaar_market::config::MarketConfig;
use bazaar_market::domain::types::ForbiddenWords;
use bazaar_market::infra::mailer::HttpMailer;
use bazaar_market::router::build_router;
use bazaar_market::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = MarketConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let raw_words = fs::read_to_string(&config.forbidden_words_path)
        .expect("failed to read forbidden words file");
    let forbidden_words = Arc::new(ForbiddenWords::parse(&raw_words));

    let mailer = HttpMailer::new(&config.mailer_url, &config.mailer_token, &config.mail_from);

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        public_base_url: config.public_base_url,
        mailer,
        forbidden_words,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.market_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("market service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
