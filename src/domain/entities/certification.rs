use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve, resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};
use crate::utils::dates::format_month_year;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Certification {
    pub id: Option<Uuid>,
    pub order: i32,
    pub is_featured: bool,

    #[validate(length(min = 1, message = "English name is required"))]
    pub name_en: String,
    pub name_es: Option<String>,

    pub description_en: Option<String>,
    pub description_es: Option<String>,

    #[validate(length(min = 1, message = "English issuer is required"))]
    pub issuer_en: String,
    pub issuer_es: Option<String>,

    pub logo_url: Option<String>,
    pub certificate_url: Option<String>,

    #[validate(required(message = "Issue date is required"))]
    pub issue_date: Option<NaiveDate>,

    pub is_verified: bool,
    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Certification {
    const KIND: Collection = Collection::Certifications;

    entry_accessors!();

    fn is_featured(&self) -> Option<bool> {
        Some(self.is_featured)
    }

    fn set_featured(&mut self, featured: bool) {
        self.is_featured = featured;
    }

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        Certification {
            order: ordinal,
            is_visible: true,
            issue_date: Some(Utc::now().date_naive()),
            ..Default::default()
        }
    }
}

impl Bilingual for Certification {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "name" => Some((Some(self.name_en.as_str()), self.name_es.as_deref())),
            "description" => Some((self.description_en.as_deref(), self.description_es.as_deref())),
            "issuer" => Some((Some(self.issuer_en.as_str()), self.issuer_es.as_deref())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedCertification {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub issuer: String,
    pub logo_url: Option<String>,
    pub certificate_url: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub issued: Option<String>,
    pub is_verified: bool,
}

impl Certification {
    pub fn localize(&self, locale: Locale) -> LocalizedCertification {
        LocalizedCertification {
            id: self.id,
            name: resolve_text(self, "name", locale),
            description: resolve(self, "description", locale).map(String::from),
            issuer: resolve_text(self, "issuer", locale),
            logo_url: self.logo_url.clone(),
            certificate_url: self.certificate_url.clone(),
            issue_date: self.issue_date,
            issued: self.issue_date.map(|d| format_month_year(d, locale)),
            is_verified: self.is_verified,
        }
    }
}
