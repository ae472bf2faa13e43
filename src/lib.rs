use std::sync::Arc;

use redis::Client as RedisClient;

mod domain;
mod infrastructure;
mod interfaces;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{auth, db, email, limiter, storage, utils};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::{jwt::JwtService, revocation::TokenDenylist};
use email::resend::ResendNotifier;
use entities::{
    award::Award,
    certification::Certification,
    education::Education,
    entry::Entry,
    experience::Experience,
    project::Project,
    skill::{Skill, SkillCategory},
};
use limiter::rate_limiter::ContactRateLimiter;
use repositories::{
    collection::SharedCollection,
    contact_me::ContactMeRepository,
    content::ContentRepository,
    email::EmailNotifier,
    sqlx_collection::SqlxCollectionRepo,
    sqlx_repo::{SqlxContactMeRepo, SqlxContentRepo, SqlxUserRepo},
    storage::BlobStorage,
    user::UserRepository,
};
use settings::AppConfig;
use storage::supabase::SupabaseStorage;
use use_cases::{
    auth::AuthHandler,
    collection::CollectionHandler,
    contact::{ContactMeHandler, ContactNotification},
    content::ContentHandler,
    dashboard::DashboardHandler,
    showcase::ShowcaseHandler,
    uploads::UploadHandler,
};

pub type AppAuthHandler = AuthHandler<Arc<dyn UserRepository>, JwtService>;
pub type AppCollection<E> = CollectionHandler<E, SharedCollection<E>>;
pub type AppContactHandler = ContactMeHandler<Arc<dyn ContactMeRepository>, Arc<dyn EmailNotifier>>;
pub type AppContentHandler = ContentHandler<Arc<dyn ContentRepository>>;
pub type AppUploadHandler = UploadHandler<Arc<dyn BlobStorage>>;

/// The storage and delivery implementations the application runs on.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub messages: Arc<dyn ContactMeRepository>,
    pub projects: SharedCollection<Project>,
    pub certifications: SharedCollection<Certification>,
    pub awards: SharedCollection<Award>,
    pub skill_categories: SharedCollection<SkillCategory>,
    pub skills: SharedCollection<Skill>,
    pub experience: SharedCollection<Experience>,
    pub education: SharedCollection<Education>,
    pub storage: Option<Arc<dyn BlobStorage>>,
    pub notifier: Option<Arc<dyn EmailNotifier>>,
}

impl Backends {
    pub fn postgres(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        let storage = match (&config.storage_url, &config.storage_service_key) {
            (Some(url), Some(key)) => Some(Arc::new(SupabaseStorage::new(url, key)) as Arc<dyn BlobStorage>),
            _ => {
                tracing::warn!("Object storage not configured, uploads are disabled");
                None
            }
        };

        let notifier = match (&config.resend_api_key, config.notification_recipient()) {
            (Some(key), Some(_)) => Some(Arc::new(ResendNotifier::new(key)) as Arc<dyn EmailNotifier>),
            _ => {
                tracing::info!("Email notifications not configured");
                None
            }
        };

        Backends {
            users: Arc::new(SqlxUserRepo::new(pool.clone())),
            content: Arc::new(SqlxContentRepo::new(pool.clone())),
            messages: Arc::new(SqlxContactMeRepo::new(pool.clone())),
            projects: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            certifications: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            awards: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            skill_categories: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            skills: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            experience: Arc::new(SqlxCollectionRepo::new(pool.clone())),
            education: Arc::new(SqlxCollectionRepo::new(pool)),
            storage,
            notifier,
        }
    }
}

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub projects: AppCollection<Project>,
    pub certifications: AppCollection<Certification>,
    pub awards: AppCollection<Award>,
    pub skill_categories: AppCollection<SkillCategory>,
    pub skills: AppCollection<Skill>,
    pub experience: AppCollection<Experience>,
    pub education: AppCollection<Education>,
    pub showcase: ShowcaseHandler,
    pub content: AppContentHandler,
    pub contact_handler: AppContactHandler,
    pub uploads: Option<AppUploadHandler>,
    pub dashboard: DashboardHandler,
    pub redis_client: Option<RedisClient>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        Self::from_backends(config, Backends::postgres(config, pool))
    }

    pub fn from_backends(config: &AppConfig, backends: Backends) -> Self {
        let redis_client = config.redis_url.as_ref().and_then(|url| {
            RedisClient::open(url.as_str())
                .map_err(|e| tracing::error!("Redis connection error: {}", e))
                .ok()
        });

        let auth_handler = AuthHandler::new(
            backends.users.clone(),
            JwtService::new(config),
            TokenDenylist::new(redis_client.clone()),
        );

        let mut contact_handler = ContactMeHandler::new(backends.messages.clone())
            .with_limiter(ContactRateLimiter::new(redis_client.clone()));
        if let (Some(notifier), Some(to)) = (backends.notifier.clone(), config.notification_recipient()) {
            contact_handler = contact_handler.with_notification(ContactNotification {
                notifier,
                from: config.resend_from_email.clone(),
                to: to.to_string(),
            });
        }

        let showcase = ShowcaseHandler {
            projects: backends.projects.clone(),
            certifications: backends.certifications.clone(),
            awards: backends.awards.clone(),
            skill_categories: backends.skill_categories.clone(),
            skills: backends.skills.clone(),
            experience: backends.experience.clone(),
            education: backends.education.clone(),
            content: backends.content.clone(),
        };

        let dashboard = DashboardHandler {
            projects: backends.projects.clone(),
            certifications: backends.certifications.clone(),
            awards: backends.awards.clone(),
            skill_categories: backends.skill_categories.clone(),
            skills: backends.skills.clone(),
            experience: backends.experience.clone(),
            education: backends.education.clone(),
            messages: backends.messages.clone(),
        };

        AppState {
            auth_handler,
            projects: CollectionHandler::new(backends.projects),
            certifications: CollectionHandler::new(backends.certifications),
            awards: CollectionHandler::new(backends.awards),
            skill_categories: CollectionHandler::new(backends.skill_categories),
            skills: CollectionHandler::new(backends.skills),
            experience: CollectionHandler::new(backends.experience),
            education: CollectionHandler::new(backends.education),
            showcase,
            content: ContentHandler::new(backends.content),
            contact_handler,
            uploads: backends
                .storage
                .map(|storage| UploadHandler::new(storage, config.max_upload_bytes())),
            dashboard,
            redis_client,
            config: config.clone(),
        }
    }
}

/// Gives generic handlers the collection that belongs to `E`.
pub trait CollectionState<E: Entry> {
    fn collection(&self) -> &AppCollection<E>;
}

macro_rules! collection_state {
    ($($entry:ty => $field:ident),+ $(,)?) => {
        $(
            impl CollectionState<$entry> for AppState {
                fn collection(&self) -> &AppCollection<$entry> {
                    &self.$field
                }
            }
        )+
    };
}

collection_state! {
    Project => projects,
    Certification => certifications,
    Award => awards,
    SkillCategory => skill_categories,
    Skill => skills,
    Experience => experience,
    Education => education,
}
