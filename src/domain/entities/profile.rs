use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The hero block at the top of the home page. There is at most one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Profile {
    pub id: Option<Uuid>,

    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    pub subtitle: String,
    pub description: String,
    pub badge_text: String,
    pub profile_image_url: Option<String>,
    pub resume_url: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
