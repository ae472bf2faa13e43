use uuid::Uuid;

use crate::{
    entities::contact_me::{ContactMeForm, ContactMeFormInsert, ContactMeListResponse, ContactMeMessage, ContactMeResponse, MessageFilter},
    errors::{AppError, ContactError},
    limiter::rate_limiter::ContactRateLimiter,
    repositories::{
        contact_me::ContactMeRepository,
        email::{EmailNotifier, OutgoingEmail},
    },
    use_cases::editor::{Confirmation, DeleteOutcome},
    utils::markdown::text_to_html,
};

/// Where new-message notifications go.
pub struct ContactNotification<N> {
    pub notifier: N,
    pub from: String,
    pub to: String,
}

pub struct ContactMeHandler<R, N>
where
    R: ContactMeRepository,
    N: EmailNotifier,
{
    pub contact_repo: R,
    notification: Option<ContactNotification<N>>,
    limiter: Option<ContactRateLimiter>,
}

impl<R, N> ContactMeHandler<R, N>
where
    R: ContactMeRepository,
    N: EmailNotifier,
{
    pub fn new(contact_repo: R) -> Self {
        ContactMeHandler {
            contact_repo,
            notification: None,
            limiter: None,
        }
    }

    pub fn with_notification(mut self, notification: ContactNotification<N>) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn with_limiter(mut self, limiter: ContactRateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn sends_notifications(&self) -> bool {
        self.notification.is_some()
    }

    /// Stores a public submission and notifies the owner.
    ///
    /// Only the first invalid field is reported. Notification problems are
    /// logged; the message is already stored by then.
    pub async fn submit(&self, form: ContactMeForm) -> Result<ContactMeResponse, ContactError> {
        if let Some(field) = form.first_error() {
            return Err(ContactError::Invalid(field));
        }

        if let Some(limiter) = &self.limiter {
            if !limiter.check(&form.email).await {
                tracing::warn!("Contact submission rate limited");
                return Err(ContactError::RateLimited);
            }
        }

        let message = ContactMeFormInsert::from(form);
        let id = self.contact_repo.create_contact_message(&message).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store contact message");
            ContactError::Failed(e)
        })?;

        self.notify(&message).await;

        Ok(ContactMeResponse {
            success: true,
            message: "Message sent successfully".to_string(),
            id,
        })
    }

    async fn notify(&self, message: &ContactMeFormInsert) {
        let Some(notification) = &self.notification else {
            return;
        };

        let email = OutgoingEmail {
            from: notification.from.clone(),
            to: notification.to.clone(),
            subject: format!("Portfolio Contact: {}", message.subject),
            html: notification_html(message),
        };

        if let Err(e) = notification.notifier.send(&email).await {
            tracing::warn!(error = %e, "Contact notification email failed");
        }
    }

    pub async fn get_contact_message_by_id(&self, id: Uuid) -> Result<ContactMeMessage, AppError> {
        self.contact_repo.get_contact_message_by_id(id).await
    }

    /// Lists messages newest first with totals for the inbox header.
    pub async fn list_contact_messages(&self, filter: MessageFilter) -> Result<ContactMeListResponse, AppError> {
        let (messages, total, unread) = tokio::try_join!(
            self.contact_repo.list_contact_messages(filter),
            self.contact_repo.count_contact_messages(MessageFilter::All),
            self.contact_repo.count_contact_messages(MessageFilter::Unread),
        )?;

        Ok(ContactMeListResponse { messages, total, unread })
    }

    /// Flips the read flag and returns the updated message.
    pub async fn toggle_read(&self, id: Uuid) -> Result<ContactMeMessage, AppError> {
        let mut message = self.contact_repo.get_contact_message_by_id(id).await?;
        message.is_read = !message.is_read;
        self.contact_repo.set_read(id, message.is_read).await?;
        Ok(message)
    }

    pub async fn delete_contact_message(&self, id: Uuid, confirmation: Confirmation) -> Result<DeleteOutcome, AppError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.contact_repo.delete_contact_message(id).await?;
        tracing::info!(%id, "Contact message deleted");
        Ok(DeleteOutcome::Deleted)
    }
}

fn notification_html(message: &ContactMeFormInsert) -> String {
    format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>From:</strong> {} ({})</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        text_to_html(&message.name),
        text_to_html(&message.email),
        text_to_html(&message.subject),
        text_to_html(&message.message),
    )
}
