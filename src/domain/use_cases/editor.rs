//! The admin editing session for one ordered collection.
//!
//! An editor owns a local copy of the list. Edits and drafts stay local until
//! saved; every successful write is followed by a reload so the local list
//! matches what was persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::entry::{Entry, EntryFlag};
use crate::errors::AppError;
use crate::repositories::collection::CollectionRepository;
use crate::use_cases::reorder::{assign_ordinals, move_entry, ordinal_updates, DragMove, ReorderOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Cancelled,
    DiscardedDraft,
    Deleted,
}

pub struct CollectionEditor<'r, E, R>
where
    E: Entry,
    R: CollectionRepository<E> + ?Sized,
{
    repo: &'r R,
    scope: Option<Uuid>,
    entries: Vec<E>,
}

impl<'r, E, R> CollectionEditor<'r, E, R>
where
    E: Entry,
    R: CollectionRepository<E> + ?Sized,
{
    /// An empty session; call [`load`](Self::load) to populate it.
    pub fn new(repo: &'r R, scope: Option<Uuid>) -> Self {
        CollectionEditor {
            repo,
            scope,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<E> {
        self.entries
    }

    pub fn scope(&self) -> Option<Uuid> {
        self.scope
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == Some(id))
    }

    /// Replaces the local list with the stored one. On failure the local list
    /// is kept as it was.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let entries = self.repo.list(self.scope).await?;
        self.entries = entries;
        Ok(())
    }

    /// Appends an unsaved draft after the current last entry and returns its
    /// position.
    pub fn add(&mut self) -> usize {
        let ordinal = self
            .entries
            .iter()
            .map(Entry::ordinal)
            .max()
            .map(|max| max + 1)
            .unwrap_or_else(|| E::KIND.ordinal_base());

        self.entries.push(E::draft(ordinal, self.scope));
        self.entries.len() - 1
    }

    /// Changes an entry locally. Nothing is written until [`save`](Self::save).
    pub fn edit<F>(&mut self, index: usize, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut E),
    {
        let entry = self.entry_mut(index)?;
        f(entry);
        Ok(())
    }

    /// Persists the entry at `index`. Local edits are kept when the write fails.
    pub async fn save(&mut self, index: usize) -> Result<E, AppError> {
        let entry = self.entry(index)?.clone();
        self.persist(&entry).await
    }

    /// Persists an entry built outside the session, creating it when it has
    /// no id yet.
    pub async fn save_entry(&mut self, mut entry: E) -> Result<E, AppError> {
        if let (None, None, Some(parent)) = (entry.id(), entry.parent_id(), self.scope) {
            entry.set_parent(parent);
        }
        self.persist(&entry).await
    }

    pub async fn delete(&mut self, index: usize, confirmation: Confirmation) -> Result<DeleteOutcome, AppError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.entry(index)?.id() {
            None => {
                self.entries.remove(index);
                Ok(DeleteOutcome::DiscardedDraft)
            }
            Some(id) => {
                self.repo.delete(id).await?;
                tracing::info!(collection = %E::KIND, %id, "Entry deleted");
                self.refresh().await;
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    /// Deletes a stored entry that may not be part of the local list.
    pub async fn delete_by_id(&mut self, id: Uuid, confirmation: Confirmation) -> Result<DeleteOutcome, AppError> {
        if confirmation == Confirmation::Declined {
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.position_of(id) {
            Some(index) => self.delete(index, confirmation).await,
            None => {
                self.repo.delete(id).await?;
                tracing::info!(collection = %E::KIND, %id, "Entry deleted");
                self.refresh().await;
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    /// Flips `is_visible` and returns the new value.
    pub async fn toggle_visibility(&mut self, index: usize) -> Result<bool, AppError> {
        self.toggle(index, EntryFlag::Visible).await
    }

    /// Flips `is_featured` and returns the new value.
    pub async fn toggle_featured(&mut self, index: usize) -> Result<bool, AppError> {
        if !E::KIND.is_featurable() {
            return Err(AppError::InvalidInput(format!("{} cannot be featured", E::KIND)));
        }
        self.toggle(index, EntryFlag::Featured).await
    }

    /// Applies a drag gesture optimistically, then writes the ordinal of every
    /// stored entry.
    ///
    /// The local list shows the new order before anything is written. If a
    /// write fails the list is reloaded from storage and the write error is
    /// returned; earlier writes in the batch are not undone.
    pub async fn reorder(&mut self, drag: DragMove) -> Result<ReorderOutcome, AppError> {
        require_scope::<E>(self.scope)?;
        let DragMove { source_index, destination_index } = drag;

        let mut reordered = self.entries.clone();
        move_entry(&mut reordered, source_index, destination_index)?;

        if source_index == destination_index {
            return Ok(ReorderOutcome::Unchanged);
        }

        assign_ordinals(&mut reordered, E::KIND.ordinal_base());
        let updates = ordinal_updates(&reordered);
        self.entries = reordered;

        match self.repo.apply_ordinals(&updates).await {
            Ok(writes) => {
                tracing::debug!(collection = %E::KIND, writes, "Ordinals persisted");
                Ok(ReorderOutcome::Persisted { writes })
            }
            Err(e) => {
                tracing::warn!(collection = %E::KIND, error = %e, "Reorder failed, reloading");
                self.refresh().await;
                Err(e)
            }
        }
    }

    async fn toggle(&mut self, index: usize, flag: EntryFlag) -> Result<bool, AppError> {
        let entry = self.entry(index)?;
        let current = entry.flag(flag).unwrap_or(false);
        let next = !current;

        match entry.id() {
            None => {
                self.entry_mut(index)?.set_flag(flag, next);
            }
            Some(id) => {
                self.repo.set_flag(id, flag, next).await?;
                self.refresh().await;
            }
        }
        Ok(next)
    }

    async fn persist(&mut self, entry: &E) -> Result<E, AppError> {
        entry.validate()?;

        let saved = match entry.id() {
            Some(_) => self.repo.upsert(entry).await?,
            None => self.repo.insert(entry).await?,
        };

        tracing::info!(collection = %E::KIND, id = ?saved.id(), "Entry saved");
        self.refresh().await;
        Ok(saved)
    }

    /// Reloads after a successful write. A failed reload is logged and the
    /// local list keeps its current state; the write itself already happened.
    async fn refresh(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!(collection = %E::KIND, error = %e, "Reload after write failed");
        }
    }

    fn entry(&self, index: usize) -> Result<&E, AppError> {
        self.entries
            .get(index)
            .ok_or_else(|| AppError::InvalidInput(format!("No entry at position {index}")))
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut E, AppError> {
        self.entries
            .get_mut(index)
            .ok_or_else(|| AppError::InvalidInput(format!("No entry at position {index}")))
    }
}

/// Nested collections are ordered per parent, so ordering work needs one.
pub fn require_scope<E: Entry>(scope: Option<Uuid>) -> Result<(), AppError> {
    match (E::KIND.parent_column(), scope) {
        (Some(column), None) => Err(AppError::InvalidInput(format!("{column} is required"))),
        _ => Ok(()),
    }
}
