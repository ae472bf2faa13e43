//! In-process implementations of the repository ports.
//!
//! They back the editor and HTTP test suites and can be told to fail specific
//! calls, which is how partial-write scenarios are exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    entities::{
        about::About,
        contact_me::{ContactMeFormInsert, ContactMeMessage, MessageFilter},
        entry::{Entry, EntryFlag},
        profile::Profile,
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::{
        collection::CollectionRepository,
        contact_me::ContactMeRepository,
        content::ContentRepository,
        email::{EmailNotifier, OutgoingEmail},
        storage::BlobStorage,
        user::UserRepository,
    },
};

fn injected(what: &str) -> AppError {
    AppError::ServiceUnavailable(format!("{what} failed"))
}

pub struct MemoryCollectionRepo<E> {
    rows: Mutex<Vec<E>>,
    ordinal_writes: Mutex<Vec<(Uuid, i32)>>,
    fail_ordinal_at: Mutex<Option<usize>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    list_calls: AtomicUsize,
}

impl<E: Entry> Default for MemoryCollectionRepo<E> {
    fn default() -> Self {
        MemoryCollectionRepo {
            rows: Mutex::new(Vec::new()),
            ordinal_writes: Mutex::new(Vec::new()),
            fail_ordinal_at: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
        }
    }
}

impl<E: Entry> MemoryCollectionRepo<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows as they would come back from storage; missing ids are filled in.
    pub fn with_rows(rows: Vec<E>) -> Self {
        let repo = Self::default();
        *repo.rows.lock() = rows
            .into_iter()
            .map(|mut row| {
                if row.id().is_none() {
                    row.assign_id(Uuid::new_v4());
                }
                row
            })
            .collect();
        repo
    }

    /// Rows in storage order.
    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().clone()
    }

    /// Every ordinal write received, in call order, including the failed one.
    pub fn ordinal_writes(&self) -> Vec<(Uuid, i32)> {
        self.ordinal_writes.lock().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Makes the `n`th ordinal write (zero-based, counted from now) fail.
    pub fn fail_ordinal_write_at(&self, n: usize) {
        let already = self.ordinal_writes.lock().len();
        *self.fail_ordinal_at.lock() = Some(already + n);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        Ok(())
    }

    fn sorted(mut rows: Vec<E>) -> Vec<E> {
        // Stable sort keeps insertion order for equal ordinals.
        rows.sort_by_key(|row| row.ordinal());
        rows
    }

    fn with_row<T>(&self, id: Uuid, f: impl FnOnce(&mut E) -> T) -> Result<T, AppError> {
        let mut rows = self.rows.lock();
        rows.iter_mut()
            .find(|row| row.id() == Some(id))
            .map(f)
            .ok_or_else(|| AppError::NotFound(format!("No {} entry with id {id}", E::KIND)))
    }
}

#[async_trait]
impl<E: Entry> CollectionRepository<E> for MemoryCollectionRepo<E> {
    async fn list(&self, scope: Option<Uuid>) -> Result<Vec<E>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }

        let rows = self
            .rows
            .lock()
            .iter()
            .filter(|row| match (E::KIND.parent_column(), scope) {
                (Some(_), Some(parent)) => row.parent_id() == Some(parent),
                _ => true,
            })
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn list_visible(&self, featured_only: bool) -> Result<Vec<E>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }

        let rows = self
            .rows
            .lock()
            .iter()
            .filter(|row| row.is_visible())
            .filter(|row| !featured_only || row.is_featured().unwrap_or(true))
            .cloned()
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn insert(&self, entry: &E) -> Result<E, AppError> {
        self.check_write()?;
        let mut saved = entry.clone();
        saved.assign_id(Uuid::new_v4());
        self.rows.lock().push(saved.clone());
        Ok(saved)
    }

    async fn upsert(&self, entry: &E) -> Result<E, AppError> {
        self.check_write()?;
        let id = entry
            .id()
            .ok_or_else(|| AppError::InvalidInput("Cannot update an entry without an id".into()))?;

        let mut rows = self.rows.lock();
        match rows.iter_mut().find(|row| row.id() == Some(id)) {
            Some(row) => *row = entry.clone(),
            None => rows.push(entry.clone()),
        }
        Ok(entry.clone())
    }

    async fn update_ordinal(&self, id: Uuid, ordinal: i32) -> Result<(), AppError> {
        let attempt = {
            let mut writes = self.ordinal_writes.lock();
            writes.push((id, ordinal));
            writes.len() - 1
        };
        if *self.fail_ordinal_at.lock() == Some(attempt) {
            return Err(injected("ordinal write"));
        }
        self.check_write()?;
        self.with_row(id, |row| row.set_ordinal(ordinal))
    }

    async fn set_flag(&self, id: Uuid, flag: EntryFlag, value: bool) -> Result<(), AppError> {
        self.check_write()?;
        if flag == EntryFlag::Featured && !E::KIND.is_featurable() {
            return Err(AppError::InvalidInput(format!("{} cannot be featured", E::KIND)));
        }
        self.with_row(id, |row| row.set_flag(flag, value))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.check_write()?;
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|row| row.id() != Some(id));
        if rows.len() == before {
            return Err(AppError::NotFound(format!("No {} entry with id {id}", E::KIND)));
        }
        Ok(())
    }

    async fn count(&self, flags: &[EntryFlag]) -> Result<i64, AppError> {
        let rows = self.rows.lock();
        let count = rows
            .iter()
            .filter(|row| flags.iter().all(|flag| row.flag(*flag).unwrap_or(false)))
            .count();
        Ok(count as i64)
    }
}

#[derive(Default)]
pub struct MemoryContentRepo {
    profile: Mutex<Option<Profile>>,
    about: Mutex<Option<About>>,
}

impl MemoryContentRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepo {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        Ok(self.profile.lock().clone())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        let mut stored = self.profile.lock();
        let mut saved = profile.clone();
        saved.id = saved.id.or_else(|| stored.as_ref().and_then(|p| p.id)).or_else(|| Some(Uuid::new_v4()));
        saved.updated_at = Some(Utc::now());
        *stored = Some(saved.clone());
        Ok(saved)
    }

    async fn get_about(&self) -> Result<Option<About>, AppError> {
        Ok(self.about.lock().clone())
    }

    async fn save_about(&self, about: &About) -> Result<About, AppError> {
        let mut stored = self.about.lock();
        let mut saved = about.clone();
        saved.id = saved.id.or_else(|| stored.as_ref().and_then(|a| a.id)).or_else(|| Some(Uuid::new_v4()));
        saved.updated_at = Some(Utc::now());
        *stored = Some(saved.clone());
        Ok(saved)
    }
}

#[derive(Default)]
pub struct MemoryContactRepo {
    messages: Mutex<Vec<ContactMeMessage>>,
    fail_writes: AtomicBool,
}

impl MemoryContactRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<ContactMeMessage> {
        self.messages.lock().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContactMeRepository for MemoryContactRepo {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<Uuid, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("insert"));
        }
        let id = Uuid::new_v4();
        self.messages.lock().push(ContactMeMessage {
            id,
            name: msg.name.clone(),
            email: msg.email.clone(),
            subject: msg.subject.clone(),
            message: msg.message.clone(),
            is_read: false,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_contact_message_by_id(&self, id: Uuid) -> Result<ContactMeMessage, AppError> {
        self.messages
            .lock()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Contact message not found".into()))
    }

    async fn list_contact_messages(&self, filter: MessageFilter) -> Result<Vec<ContactMeMessage>, AppError> {
        let mut messages: Vec<_> = self
            .messages
            .lock()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        // Newest first; later inserts win ties.
        messages.reverse();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn count_contact_messages(&self, filter: MessageFilter) -> Result<i64, AppError> {
        let count = self.messages.lock().iter().filter(|m| filter.matches(m)).count();
        Ok(count as i64)
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<(), AppError> {
        let mut messages = self.messages.lock();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound("Contact message not found".into()))?;
        message.is_read = is_read;
        Ok(())
    }

    async fn delete_contact_message(&self, id: Uuid) -> Result<(), AppError> {
        let mut messages = self.messages.lock();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Err(AppError::NotFound("Contact message not found".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.users.lock().len() as i64)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.users.lock().iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().iter().find(|u| u.id == *id).cloned())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User with this email already exists".to_string()));
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        users.push(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }
}

/// Keeps uploaded objects in memory under `{bucket}/{path}`.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects.lock().iter().any(|(b, p, _)| b == bucket && p == path)
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, AppError> {
        self.objects.lock().push((bucket.to_string(), path.to_string(), bytes));
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), AppError> {
        self.objects
            .lock()
            .retain(|(b, p, _)| !(b == bucket && paths.contains(p)));
        Ok(())
    }
}

/// Records every email instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmailNotifier for RecordingNotifier {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected("email"));
        }
        self.sent.lock().push(email.clone());
        Ok(())
    }
}
