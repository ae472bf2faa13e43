use std::marker::PhantomData;

use serde::Serialize;
use uuid::Uuid;

use crate::entities::entry::{Entry, EntryFlag};
use crate::errors::AppError;
use crate::repositories::collection::CollectionRepository;
use crate::use_cases::editor::{require_scope, CollectionEditor, Confirmation, DeleteOutcome};
use crate::use_cases::reorder::{DragMove, ReorderOutcome};

/// The result of one admin action together with the list as reloaded after it.
#[derive(Debug, Serialize)]
pub struct EditorReply<E, T> {
    pub result: T,
    pub entries: Vec<E>,
}

/// Entry point for everything done to one collection, admin and public side.
pub struct CollectionHandler<E, R> {
    repo: R,
    _entry: PhantomData<fn() -> E>,
}

impl<E, R> CollectionHandler<E, R>
where
    E: Entry,
    R: CollectionRepository<E>,
{
    pub fn new(repo: R) -> Self {
        CollectionHandler {
            repo,
            _entry: PhantomData,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// An empty editor; nothing is fetched yet.
    pub fn editor(&self, scope: Option<Uuid>) -> CollectionEditor<'_, E, R> {
        CollectionEditor::new(&self.repo, scope)
    }

    /// An editor holding the current stored list.
    pub async fn session(&self, scope: Option<Uuid>) -> Result<CollectionEditor<'_, E, R>, AppError> {
        let mut editor = self.editor(scope);
        editor.load().await?;
        Ok(editor)
    }

    pub async fn list(&self, scope: Option<Uuid>) -> Result<Vec<E>, AppError> {
        Ok(self.session(scope).await?.into_entries())
    }

    /// The loaded list plus a fresh draft at its end. The draft is not stored.
    pub async fn draft(&self, scope: Option<Uuid>) -> Result<EditorReply<E, E>, AppError> {
        require_scope::<E>(scope)?;
        let mut editor = self.session(scope).await?;
        let index = editor.add();
        let draft = editor.entries()[index].clone();
        Ok(EditorReply {
            result: draft,
            entries: editor.into_entries(),
        })
    }

    pub async fn save(&self, scope: Option<Uuid>, entry: E) -> Result<EditorReply<E, E>, AppError> {
        let mut editor = self.editor(scope);
        let saved = editor.save_entry(entry).await?;
        Ok(EditorReply {
            result: saved,
            entries: editor.into_entries(),
        })
    }

    pub async fn reorder(&self, scope: Option<Uuid>, drag: DragMove) -> Result<EditorReply<E, ReorderOutcome>, AppError> {
        require_scope::<E>(scope)?;
        let mut editor = self.session(scope).await?;
        let outcome = editor.reorder(drag).await?;
        Ok(EditorReply {
            result: outcome,
            entries: editor.into_entries(),
        })
    }

    pub async fn delete(
        &self,
        scope: Option<Uuid>,
        id: Uuid,
        confirmation: Confirmation,
    ) -> Result<EditorReply<E, DeleteOutcome>, AppError> {
        if confirmation == Confirmation::Declined {
            return Ok(EditorReply {
                result: DeleteOutcome::Cancelled,
                entries: Vec::new(),
            });
        }

        let mut editor = self.session(scope).await?;
        let outcome = editor.delete_by_id(id, confirmation).await?;
        Ok(EditorReply {
            result: outcome,
            entries: editor.into_entries(),
        })
    }

    pub async fn toggle(&self, scope: Option<Uuid>, id: Uuid, flag: EntryFlag) -> Result<EditorReply<E, bool>, AppError> {
        let mut editor = self.session(scope).await?;
        let index = editor
            .position_of(id)
            .ok_or_else(|| AppError::NotFound(format!("No {} entry with id {id}", E::KIND)))?;

        let value = match flag {
            EntryFlag::Visible => editor.toggle_visibility(index).await?,
            EntryFlag::Featured => editor.toggle_featured(index).await?,
        };
        Ok(EditorReply {
            result: value,
            entries: editor.into_entries(),
        })
    }

    /// Visible rows in display order.
    pub async fn visible(&self) -> Result<Vec<E>, AppError> {
        self.repo.list_visible(false).await
    }

    /// Visible and featured rows; collections without the flag return every visible row.
    pub async fn featured(&self) -> Result<Vec<E>, AppError> {
        self.repo.list_visible(E::KIND.is_featurable()).await
    }

    pub async fn count(&self, flags: &[EntryFlag]) -> Result<i64, AppError> {
        self.repo.count(flags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::certification::Certification;
    use crate::entities::project::Project;
    use crate::entities::skill::Skill;
    use crate::repositories::memory::MemoryCollectionRepo;

    fn project(title: &str, order: i32, visible: bool, featured: bool) -> Project {
        Project {
            title_en: title.into(),
            description_en: "d".into(),
            is_visible: visible,
            is_featured: featured,
            ..Project::draft(order, None)
        }
    }

    fn handler() -> CollectionHandler<Project, MemoryCollectionRepo<Project>> {
        CollectionHandler::new(MemoryCollectionRepo::with_rows(vec![
            project("Hidden", 0, false, true),
            project("Plain", 1, true, false),
            project("Star", 2, true, true),
        ]))
    }

    #[actix_rt::test]
    async fn featured_means_visible_and_featured() {
        let featured = handler().featured().await.unwrap();
        let titles: Vec<_> = featured.iter().map(|p| p.title_en.as_str()).collect();
        assert_eq!(titles, vec!["Star"]);
    }

    #[actix_rt::test]
    async fn visible_keeps_display_order() {
        let visible = handler().visible().await.unwrap();
        let titles: Vec<_> = visible.iter().map(|p| p.title_en.as_str()).collect();
        assert_eq!(titles, vec!["Plain", "Star"]);
    }

    #[actix_rt::test]
    async fn declined_delete_does_not_reach_storage() {
        let handler = handler();
        let id = handler.repo().rows()[0].id.unwrap();

        let reply = handler.delete(None, id, Confirmation::Declined).await.unwrap();

        assert_eq!(reply.result, DeleteOutcome::Cancelled);
        assert_eq!(handler.repo().list_calls(), 0);
        assert_eq!(handler.repo().rows().len(), 3);
    }

    #[actix_rt::test]
    async fn toggling_an_unknown_id_is_not_found() {
        let err = handler().toggle(None, Uuid::new_v4(), EntryFlag::Visible).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn draft_is_returned_but_not_stored() {
        let handler = CollectionHandler::<Certification, _>::new(MemoryCollectionRepo::new());

        let reply = handler.draft(None).await.unwrap();

        assert!(reply.result.id.is_none());
        assert!(reply.result.is_visible);
        assert_eq!(reply.entries.len(), 1);
        assert!(handler.repo().rows().is_empty());
    }

    #[actix_rt::test]
    async fn skill_drafts_need_a_category() {
        let skills: CollectionHandler<Skill, _> = CollectionHandler::new(MemoryCollectionRepo::<Skill>::new());

        assert!(matches!(skills.draft(None).await, Err(AppError::InvalidInput(_))));
        assert_eq!(skills.repo().list_calls(), 0);

        let category = Uuid::new_v4();
        let reply = skills.draft(Some(category)).await.unwrap();
        assert_eq!(reply.result.category_id, Some(category));
    }
}
