use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};
use crate::utils::dates::format_date_range;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Education {
    pub id: Option<Uuid>,
    pub order: i32,

    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,

    #[validate(length(min = 1, message = "English degree is required"))]
    pub degree_en: String,
    pub degree_es: Option<String>,

    #[validate(length(min = 1, message = "English institution is required"))]
    pub institution_en: String,
    pub institution_es: Option<String>,

    pub logo_url: Option<String>,

    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub gpa: Option<String>,
    pub show_gpa: bool,
    pub subjects: Vec<String>,
    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Education {
    const KIND: Collection = Collection::Education;

    entry_accessors!();

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        Education {
            order: ordinal,
            is_visible: true,
            start_date: Some(Utc::now().date_naive()),
            ..Default::default()
        }
    }
}

impl Bilingual for Education {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "degree" => Some((Some(self.degree_en.as_str()), self.degree_es.as_deref())),
            "institution" => Some((Some(self.institution_en.as_str()), self.institution_es.as_deref())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedEducation {
    pub id: Option<Uuid>,
    pub level: String,
    pub degree: String,
    pub institution: String,
    pub logo_url: Option<String>,
    pub period: Option<String>,
    pub gpa: Option<String>,
    pub subjects: Vec<String>,
}

impl Education {
    pub fn localize(&self, locale: Locale) -> LocalizedEducation {
        LocalizedEducation {
            id: self.id,
            level: self.level.clone(),
            degree: resolve_text(self, "degree", locale),
            institution: resolve_text(self, "institution", locale),
            logo_url: self.logo_url.clone(),
            period: self
                .start_date
                .map(|start| format_date_range(start, self.end_date, locale)),
            // GPA stays private unless explicitly shown
            gpa: self.gpa.clone().filter(|_| self.show_gpa),
            subjects: self.subjects.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpa_hidden_unless_flagged() {
        let mut edu = Education {
            level: "Bachelor".into(),
            degree_en: "Computer Science".into(),
            institution_en: "MIT".into(),
            gpa: Some("3.9".into()),
            ..Education::draft(0, None)
        };
        assert_eq!(edu.localize(Locale::En).gpa, None);

        edu.show_gpa = true;
        assert_eq!(edu.localize(Locale::En).gpa.as_deref(), Some("3.9"));
    }
}
