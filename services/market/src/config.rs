/// Market service configuration loaded from environment variables.
#[derive(Debug)]
pub struct MarketConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3114). Env var: `MARKET_PORT`.
    pub market_port: u16,
    /// Public origin used when building emailed links
    /// (e.g. "https://bazaar.example.com").
    pub public_base_url: String,
    /// Mail provider endpoint the service POSTs messages to.
    pub mailer_url: String,
    /// Bearer token for the mail provider.
    pub mailer_token: String,
    /// Sender address on outbound mail.
    pub mail_from: String,
    /// Newline-delimited deny list applied to listing and review text
    /// (default `forbidden_words.txt` next to the binary).
    pub forbidden_words_path: String,
}

impl MarketConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            market_port: std::env::var("MARKET_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            public_base_url: std::env::var("PUBLIC_BASE_URL").expect("PUBLIC_BASE_URL"),
            mailer_url: std::env::var("MAILER_URL").expect("MAILER_URL"),
            mailer_token: std::env::var("MAILER_TOKEN").expect("MAILER_TOKEN"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            forbidden_words_path: std::env::var("FORBIDDEN_WORDS_PATH")
                .unwrap_or_else(|_| "forbidden_words.txt".to_owned()),
        }
    }
}
