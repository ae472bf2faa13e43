use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{field_errors, AppError, FieldError};

/// Fields in the order their problems are reported back to the sender.
pub const CONTACT_FIELD_ORDER: [&str; 4] = ["name", "email", "subject", "message"];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactMeForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 5, message = "Subject must be at least 5 characters"))]
    pub subject: String,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl ContactMeForm {
    /// Validates the form and returns only the first problem, following
    /// [`CONTACT_FIELD_ORDER`].
    pub fn first_error(&self) -> Option<FieldError> {
        let errors = self.validate().err()?;
        let all = field_errors(&errors);

        CONTACT_FIELD_ORDER
            .iter()
            .find_map(|field| all.iter().find(|e| e.field == *field).cloned())
            .or_else(|| all.into_iter().next())
    }
}

#[derive(Debug, Clone)]
pub struct ContactMeFormInsert {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ContactMeForm> for ContactMeFormInsert {
    fn from(form: ContactMeForm) -> Self {
        ContactMeFormInsert {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMeMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ContactMeResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

/// Inbox filter on the read flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl MessageFilter {
    pub fn matches(&self, message: &ContactMeMessage) -> bool {
        match self {
            MessageFilter::All => true,
            MessageFilter::Read => message.is_read,
            MessageFilter::Unread => !message.is_read,
        }
    }

    /// The `is_read` value selected by this filter, if any.
    pub fn is_read(&self) -> Option<bool> {
        match self {
            MessageFilter::All => None,
            MessageFilter::Read => Some(true),
            MessageFilter::Unread => Some(false),
        }
    }
}

impl FromStr for MessageFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MessageFilter::All),
            "read" => Ok(MessageFilter::Read),
            "unread" => Ok(MessageFilter::Unread),
            other => Err(AppError::InvalidInput(format!("Unknown message filter '{other}'"))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct MessageQuery {
    #[serde(default)]
    pub filter: MessageFilter,
}

#[derive(Debug, Serialize)]
pub struct ContactMeListResponse {
    pub messages: Vec<ContactMeMessage>,
    pub total: i64,
    pub unread: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactMeForm {
        ContactMeForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: "Hello there".into(),
            message: "I would like to talk about a project.".into(),
        }
    }

    #[test]
    fn valid_form_has_no_error() {
        assert_eq!(valid_form().first_error(), None);
    }

    #[test]
    fn reports_first_failing_field_in_form_order() {
        let form = ContactMeForm {
            email: "not-an-email".into(),
            message: "short".into(),
            ..valid_form()
        };
        let err = form.first_error().unwrap();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email address");
    }

    #[test]
    fn name_is_reported_before_everything_else() {
        let form = ContactMeForm {
            name: "A".into(),
            subject: "Hi".into(),
            ..valid_form()
        };
        let err = form.first_error().unwrap();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "Name must be at least 2 characters");
    }

    #[test]
    fn boundaries_are_inclusive() {
        let form = ContactMeForm {
            name: "Al".into(),
            subject: "Hello".into(),
            message: "0123456789".into(),
            ..valid_form()
        };
        assert_eq!(form.first_error(), None);

        let form = ContactMeForm { message: "012345678".into(), ..form };
        assert_eq!(form.first_error().unwrap().message, "Message must be at least 10 characters");
    }

    #[test]
    fn filter_selects_by_read_flag() {
        let msg = ContactMeMessage {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: "Hello".into(),
            message: "Body text here".into(),
            is_read: false,
            created_at: Utc::now(),
        };
        assert!(MessageFilter::All.matches(&msg));
        assert!(MessageFilter::Unread.matches(&msg));
        assert!(!MessageFilter::Read.matches(&msg));
        assert_eq!("unread".parse::<MessageFilter>().unwrap(), MessageFilter::Unread);
    }

    #[test]
    fn stored_values_match_the_validated_ones() {
        let form = ContactMeForm { name: " a".into(), ..valid_form() };
        assert_eq!(form.first_error(), None);

        let insert = ContactMeFormInsert::from(form);
        assert_eq!(insert.name, " a");
        assert_eq!(insert.email, "ana@example.com");
    }
}
