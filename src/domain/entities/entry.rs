use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;

/// The admin-managed collections that share the reorderable editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Projects,
    Certifications,
    Awards,
    SkillCategories,
    Skills,
    Experience,
    Education,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Projects,
        Collection::Certifications,
        Collection::Awards,
        Collection::SkillCategories,
        Collection::Skills,
        Collection::Experience,
        Collection::Education,
    ];

    /// Path segment used by the admin API.
    pub fn slug(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Certifications => "certifications",
            Collection::Awards => "awards",
            Collection::SkillCategories => "skill-categories",
            Collection::Skills => "skills",
            Collection::Experience => "experience",
            Collection::Education => "education",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Certifications => "certifications",
            Collection::Awards => "awards",
            Collection::SkillCategories => "skills_categories",
            Collection::Skills => "skills",
            Collection::Experience => "experience",
            Collection::Education => "education",
        }
    }

    /// First ordinal written after a reorder. Awards count from one.
    pub fn ordinal_base(&self) -> i32 {
        match self {
            Collection::Awards => 1,
            _ => 0,
        }
    }

    pub fn is_featurable(&self) -> bool {
        matches!(self, Collection::Projects | Collection::Certifications)
    }

    /// Column linking rows to their parent collection, if nested.
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            Collection::Skills => Some("category_id"),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown collection '{s}'")))
    }
}

/// Single-field writes issued by the visibility and featured toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFlag {
    Visible,
    Featured,
}

impl EntryFlag {
    pub fn column(&self) -> &'static str {
        match self {
            EntryFlag::Visible => "is_visible",
            EntryFlag::Featured => "is_featured",
        }
    }
}

/// One row of a reorderable collection.
///
/// Rows read from the store always carry an id; drafts created by the editor
/// do not until their first successful save.
pub trait Entry:
    Clone + fmt::Debug + Send + Sync + Unpin + Validate + Serialize + DeserializeOwned + 'static
{
    const KIND: Collection;

    fn id(&self) -> Option<Uuid>;

    /// Called by stores when a row is first persisted.
    fn assign_id(&mut self, id: Uuid);

    fn ordinal(&self) -> i32;

    fn set_ordinal(&mut self, ordinal: i32);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// `None` when the collection has no featured flag.
    fn is_featured(&self) -> Option<bool> {
        None
    }

    fn set_featured(&mut self, _featured: bool) {}

    fn parent_id(&self) -> Option<Uuid> {
        None
    }

    fn set_parent(&mut self, _parent: Uuid) {}

    /// A blank, visible, unsaved row.
    fn draft(ordinal: i32, parent: Option<Uuid>) -> Self;

    fn flag(&self, flag: EntryFlag) -> Option<bool> {
        match flag {
            EntryFlag::Visible => Some(self.is_visible()),
            EntryFlag::Featured => self.is_featured(),
        }
    }

    fn set_flag(&mut self, flag: EntryFlag, value: bool) {
        match flag {
            EntryFlag::Visible => self.set_visible(value),
            EntryFlag::Featured => self.set_featured(value),
        }
    }
}

/// Accessors for the `id`, `order` and `is_visible` fields every entry has.
macro_rules! entry_accessors {
    () => {
        fn id(&self) -> Option<::uuid::Uuid> {
            self.id
        }

        fn assign_id(&mut self, id: ::uuid::Uuid) {
            self.id = Some(id);
        }

        fn ordinal(&self) -> i32 {
            self.order
        }

        fn set_ordinal(&mut self, ordinal: i32) {
            self.order = ordinal;
        }

        fn is_visible(&self) -> bool {
            self.is_visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.is_visible = visible;
        }
    };
}

pub(crate) use entry_accessors;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_round_trip_through_their_slug() {
        for collection in Collection::ALL {
            assert_eq!(collection.slug().parse::<Collection>().unwrap(), collection);
        }
        assert!("blog".parse::<Collection>().is_err());
    }

    #[test]
    fn only_awards_count_from_one() {
        let one_based: Vec<_> = Collection::ALL
            .into_iter()
            .filter(|c| c.ordinal_base() == 1)
            .collect();
        assert_eq!(one_based, vec![Collection::Awards]);
    }

    #[test]
    fn featured_flag_exists_for_projects_and_certifications() {
        assert!(Collection::Projects.is_featurable());
        assert!(Collection::Certifications.is_featurable());
        assert!(!Collection::Awards.is_featurable());
        assert_eq!(Collection::Skills.parent_column(), Some("category_id"));
    }
}
