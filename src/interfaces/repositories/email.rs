use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError>;
}

#[async_trait]
impl<T: EmailNotifier + ?Sized> EmailNotifier for Arc<T> {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        (**self).send(email).await
    }
}
