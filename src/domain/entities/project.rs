use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve, resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Project {
    pub id: Option<Uuid>,
    pub order: i32,
    pub is_featured: bool,

    #[validate(length(min = 1, message = "English title is required"))]
    pub title_en: String,
    pub title_es: Option<String>,

    #[validate(length(min = 1, message = "English description is required"))]
    pub description_en: String,
    pub description_es: Option<String>,

    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub technologies: Vec<String>,
    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Project {
    const KIND: Collection = Collection::Projects;

    entry_accessors!();

    fn is_featured(&self) -> Option<bool> {
        Some(self.is_featured)
    }

    fn set_featured(&mut self, featured: bool) {
        self.is_featured = featured;
    }

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        Project {
            order: ordinal,
            is_visible: true,
            ..Default::default()
        }
    }
}

impl Bilingual for Project {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "title" => Some((Some(self.title_en.as_str()), self.title_es.as_deref())),
            "description" => Some((Some(self.description_en.as_str()), self.description_es.as_deref())),
            _ => None,
        }
    }
}

/// A project as rendered on the public site.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedProject {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub demo_url: Option<String>,
    pub repo_url: Option<String>,
    pub technologies: Vec<String>,
    pub is_featured: bool,
}

impl Project {
    pub fn localize(&self, locale: Locale) -> LocalizedProject {
        LocalizedProject {
            id: self.id,
            title: resolve_text(self, "title", locale),
            description: resolve(self, "description", locale).map(String::from),
            image_url: self.image_url.clone(),
            video_url: self.video_url.clone(),
            demo_url: self.demo_url.clone(),
            repo_url: self.repo_url.clone(),
            technologies: self.technologies.clone(),
            is_featured: self.is_featured,
        }
    }
}
