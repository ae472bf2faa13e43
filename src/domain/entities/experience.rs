use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};
use crate::utils::dates::format_date_range;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employment_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Internship,
    #[default]
    FullTime,
    Freelance,
    Contract,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Experience {
    pub id: Option<Uuid>,
    pub order: i32,

    #[validate(length(min = 1, message = "English position is required"))]
    pub position_en: String,
    pub position_es: Option<String>,

    #[validate(length(min = 1, message = "English company is required"))]
    pub company_en: String,
    pub company_es: Option<String>,

    pub logo_url: Option<String>,

    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub location: Option<String>,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub employment_type: EmploymentType,

    #[validate(length(min = 1, message = "English description is required"))]
    pub description_en: String,
    pub description_es: Option<String>,

    pub responsibilities: Vec<String>,
    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Experience {
    const KIND: Collection = Collection::Experience;

    entry_accessors!();

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        Experience {
            order: ordinal,
            is_visible: true,
            start_date: Some(Utc::now().date_naive()),
            ..Default::default()
        }
    }
}

impl Bilingual for Experience {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "position" => Some((Some(self.position_en.as_str()), self.position_es.as_deref())),
            "company" => Some((Some(self.company_en.as_str()), self.company_es.as_deref())),
            "description" => Some((Some(self.description_en.as_str()), self.description_es.as_deref())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedExperience {
    pub id: Option<Uuid>,
    pub position: String,
    pub company: String,
    pub description: String,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    pub period: Option<String>,
    pub is_current: bool,
    pub responsibilities: Vec<String>,
}

impl Experience {
    /// Current positions render as open-ended regardless of any stored end date.
    pub fn period(&self, locale: Locale) -> Option<String> {
        let end = if self.is_current { None } else { self.end_date };
        self.start_date
            .map(|start| format_date_range(start, end, locale))
    }

    pub fn localize(&self, locale: Locale) -> LocalizedExperience {
        LocalizedExperience {
            id: self.id,
            position: resolve_text(self, "position", locale),
            company: resolve_text(self, "company", locale),
            description: resolve_text(self, "description", locale),
            logo_url: self.logo_url.clone(),
            location: self.location.clone(),
            employment_type: self.employment_type,
            period: self.period(locale),
            is_current: self.is_current,
            responsibilities: self.responsibilities.clone(),
        }
    }
}
