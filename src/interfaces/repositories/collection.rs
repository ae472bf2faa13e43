use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::entry::{Entry, EntryFlag};
use crate::errors::AppError;
use crate::use_cases::reorder::OrdinalUpdate;

pub type SharedCollection<E> = Arc<dyn CollectionRepository<E>>;

/// Storage for one ordered collection.
#[async_trait]
pub trait CollectionRepository<E: Entry>: Send + Sync {
    /// Every row in ordinal order. `scope` restricts nested collections to a
    /// single parent and is ignored elsewhere.
    async fn list(&self, scope: Option<Uuid>) -> Result<Vec<E>, AppError>;

    /// Visible rows in ordinal order, optionally only the featured ones.
    async fn list_visible(&self, featured_only: bool) -> Result<Vec<E>, AppError>;

    async fn insert(&self, entry: &E) -> Result<E, AppError>;

    /// Writes every field of an existing row.
    async fn upsert(&self, entry: &E) -> Result<E, AppError>;

    async fn update_ordinal(&self, id: Uuid, ordinal: i32) -> Result<(), AppError>;

    /// Persists a batch of ordinal writes in order and returns how many were
    /// applied. Stops at the first failure.
    async fn apply_ordinals(&self, updates: &[OrdinalUpdate]) -> Result<usize, AppError> {
        for update in updates {
            self.update_ordinal(update.id, update.ordinal).await?;
        }
        Ok(updates.len())
    }

    async fn set_flag(&self, id: Uuid, flag: EntryFlag, value: bool) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Counts rows where every flag in `flags` is set.
    async fn count(&self, flags: &[EntryFlag]) -> Result<i64, AppError>;
}

#[async_trait]
impl<E, T> CollectionRepository<E> for Arc<T>
where
    E: Entry,
    T: CollectionRepository<E> + ?Sized,
{
    async fn list(&self, scope: Option<Uuid>) -> Result<Vec<E>, AppError> {
        (**self).list(scope).await
    }

    async fn list_visible(&self, featured_only: bool) -> Result<Vec<E>, AppError> {
        (**self).list_visible(featured_only).await
    }

    async fn insert(&self, entry: &E) -> Result<E, AppError> {
        (**self).insert(entry).await
    }

    async fn upsert(&self, entry: &E) -> Result<E, AppError> {
        (**self).upsert(entry).await
    }

    async fn update_ordinal(&self, id: Uuid, ordinal: i32) -> Result<(), AppError> {
        (**self).update_ordinal(id, ordinal).await
    }

    async fn apply_ordinals(&self, updates: &[OrdinalUpdate]) -> Result<usize, AppError> {
        (**self).apply_ordinals(updates).await
    }

    async fn set_flag(&self, id: Uuid, flag: EntryFlag, value: bool) -> Result<(), AppError> {
        (**self).set_flag(id, flag, value).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        (**self).delete(id).await
    }

    async fn count(&self, flags: &[EntryFlag]) -> Result<i64, AppError> {
        (**self).count(flags).await
    }
}
