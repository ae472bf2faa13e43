use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::bilingual::{resolve_text, Bilingual, Locale};
use crate::entities::entry::{entry_accessors, Collection, Entry};

/// A heading grouping skills on the public site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct SkillCategory {
    pub id: Option<Uuid>,
    pub order: i32,

    #[validate(length(min = 1, message = "English name is required"))]
    pub name_en: String,
    pub name_es: Option<String>,

    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for SkillCategory {
    const KIND: Collection = Collection::SkillCategories;

    entry_accessors!();

    fn draft(ordinal: i32, _parent: Option<Uuid>) -> Self {
        SkillCategory {
            order: ordinal,
            is_visible: true,
            ..Default::default()
        }
    }
}

impl Bilingual for SkillCategory {
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)> {
        match base {
            "name" => Some((Some(self.name_en.as_str()), self.name_es.as_deref())),
            _ => None,
        }
    }
}

/// Skills are ordered within their category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(default)]
pub struct Skill {
    pub id: Option<Uuid>,

    #[validate(required(message = "Category is required"))]
    pub category_id: Option<Uuid>,

    pub order: i32,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub logo_url: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Proficiency must be between 0 and 100"))]
    pub proficiency: i32,

    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry for Skill {
    const KIND: Collection = Collection::Skills;

    entry_accessors!();

    fn parent_id(&self) -> Option<Uuid> {
        self.category_id
    }

    fn set_parent(&mut self, parent: Uuid) {
        self.category_id = Some(parent);
    }

    fn draft(ordinal: i32, parent: Option<Uuid>) -> Self {
        Skill {
            category_id: parent,
            order: ordinal,
            proficiency: 50,
            is_visible: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedSkill {
    pub id: Option<Uuid>,
    pub name: String,
    pub logo_url: Option<String>,
    pub proficiency: i32,
}

impl From<&Skill> for LocalizedSkill {
    fn from(skill: &Skill) -> Self {
        LocalizedSkill {
            id: skill.id,
            name: skill.name.clone(),
            logo_url: skill.logo_url.clone(),
            proficiency: skill.proficiency,
        }
    }
}

/// A visible category together with its visible skills, both in ordinal order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillGroup {
    pub id: Option<Uuid>,
    pub name: String,
    pub skills: Vec<LocalizedSkill>,
}

/// Groups skills under their categories, keeping the input order of both and
/// dropping categories left without skills.
pub fn group_skills(categories: &[SkillCategory], skills: &[Skill], locale: Locale) -> Vec<SkillGroup> {
    categories
        .iter()
        .filter_map(|category| {
            let members: Vec<LocalizedSkill> = skills
                .iter()
                .filter(|skill| category.id.is_some() && skill.category_id == category.id)
                .map(LocalizedSkill::from)
                .collect();

            if members.is_empty() {
                return None;
            }

            Some(SkillGroup {
                id: category.id,
                name: resolve_text(category, "name", locale),
                skills: members,
            })
        })
        .collect()
}
