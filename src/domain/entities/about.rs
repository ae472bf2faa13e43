use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve_text, Bilingual, Locale};
use crate::utils::markdown::safe_markdown_to_html;

/// The "about me" text, stored as markdown in both languages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct About {
    pub id: Option<Uuid>,

    #[validate(length(min = 1, message = "English content is required"))]
    pub content_en: String,
    pub content_es: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bilingual for About {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "content" => Some((Some(self.content_en.as_str()), self.content_es.as_deref())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedAbout {
    pub content_markdown: String,
    pub content_html: String,
}

impl About {
    pub fn localize(&self, locale: Locale) -> LocalizedAbout {
        let content_markdown = resolve_text(self, "content", locale);
        LocalizedAbout {
            content_html: safe_markdown_to_html(&content_markdown),
            content_markdown,
        }
    }
}
