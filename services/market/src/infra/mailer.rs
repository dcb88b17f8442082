use anyhow::Context as _;
use serde_json::json;

use crate::domain::repository::MailerPort;
use crate::domain::types::OutboundEmail;
use crate::error::MarketServiceError;

/// HTTP client implementing `MailerPort` against a JSON mail provider.
///
/// Delivery is awaited inline with the request that triggered it, so a
/// provider outage surfaces as a 500 on that request rather than a
/// silently dropped message.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: &str, api_token: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_owned(),
            api_token: api_token.to_owned(),
            from: from.to_owned(),
        }
    }
}

impl MailerPort for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MarketServiceError> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({
                "from": self.from,
                "to": email.to,
                "subject": email.subject,
                "text": email.body,
            }))
            .send()
            .await
            .context("mailer: send")?
            .error_for_status()
            .context("mailer: provider rejected message")?;
        Ok(())
    }
}
