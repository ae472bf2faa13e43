use async_trait::async_trait;
use reqwest::Client;

use crate::errors::AppError;
use crate::repositories::email::{EmailNotifier, OutgoingEmail};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    api_key: String,
}

impl ResendNotifier {
    pub fn new(api_key: &str) -> Self {
        ResendNotifier {
            client: Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl EmailNotifier for ResendNotifier {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ServiceUnavailable(format!("Email provider returned {status}: {body}")));
        }
        Ok(())
    }
}
