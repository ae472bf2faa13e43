use validator::Validate;

use crate::entities::{about::About, profile::Profile};
use crate::errors::AppError;
use crate::repositories::content::ContentRepository;

pub struct ContentHandler<R>
where
    R: ContentRepository,
{
    pub content_repo: R,
}

impl<R> ContentHandler<R>
where
    R: ContentRepository,
{
    pub fn new(content_repo: R) -> Self {
        ContentHandler { content_repo }
    }

    pub async fn profile(&self) -> Result<Profile, AppError> {
        self.content_repo
            .get_profile()
            .await?
            .ok_or_else(|| AppError::NotFound("Profile has not been set up yet".into()))
    }

    pub async fn save_profile(&self, profile: Profile) -> Result<Profile, AppError> {
        profile.validate()?;
        let saved = self.content_repo.save_profile(&profile).await?;
        tracing::info!("Profile updated");
        Ok(saved)
    }

    pub async fn about(&self) -> Result<About, AppError> {
        self.content_repo
            .get_about()
            .await?
            .ok_or_else(|| AppError::NotFound("About section has not been written yet".into()))
    }

    pub async fn save_about(&self, about: About) -> Result<About, AppError> {
        about.validate()?;
        let saved = self.content_repo.save_about(&about).await?;
        tracing::info!("About section updated");
        Ok(saved)
    }
}
