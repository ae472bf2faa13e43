use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve, resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};
use crate::utils::dates::format_month_year;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Award {
    pub id: Option<Uuid>,
    pub order: i32,

    #[validate(length(min = 1, message = "English title is required"))]
    pub title_en: String,
    pub title_es: Option<String>,

    pub description_en: Option<String>,
    pub description_es: Option<String>,

    #[validate(length(min = 1, message = "English issuer is required"))]
    pub issuer_en: String,
    pub issuer_es: Option<String>,

    pub icon_url: Option<String>,
    pub certificate_url: Option<String>,

    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,

    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Award {
    const KIND: Collection = Collection::Awards;

    entry_accessors!();

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        Award {
            order: ordinal,
            is_visible: true,
            date: Some(Utc::now().date_naive()),
            ..Default::default()
        }
    }
}

impl Bilingual for Award {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "title" => Some((Some(self.title_en.as_str()), self.title_es.as_deref())),
            "description" => Some((self.description_en.as_deref(), self.description_es.as_deref())),
            "issuer" => Some((Some(self.issuer_en.as_str()), self.issuer_es.as_deref())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedAward {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub issuer: String,
    pub icon_url: Option<String>,
    pub certificate_url: Option<String>,
    pub date: Option<NaiveDate>,
    pub awarded: Option<String>,
}

impl Award {
    pub fn localize(&self, locale: Locale) -> LocalizedAward {
        LocalizedAward {
            id: self.id,
            title: resolve_text(self, "title", locale),
            description: resolve(self, "description", locale).map(String::from),
            issuer: resolve_text(self, "issuer", locale),
            icon_url: self.icon_url.clone(),
            certificate_url: self.certificate_url.clone(),
            date: self.date,
            awarded: self.date.map(|d| format_month_year(d, locale)),
        }
    }
}
