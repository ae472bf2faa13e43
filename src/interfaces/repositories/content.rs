use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::{about::About, profile::Profile},
    errors::AppError,
    repositories::sqlx_repo::SqlxContentRepo,
};

/// Single-row content blocks: the profile hero and the about text.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError>;
    async fn save_profile(&self, profile: &Profile) -> Result<Profile, AppError>;
    async fn get_about(&self) -> Result<Option<About>, AppError>;
    async fn save_about(&self, about: &About) -> Result<About, AppError>;
}

#[async_trait]
impl<T: ContentRepository + ?Sized> ContentRepository for Arc<T> {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        (**self).get_profile().await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        (**self).save_profile(profile).await
    }

    async fn get_about(&self) -> Result<Option<About>, AppError> {
        (**self).get_about().await
    }

    async fn save_about(&self, about: &About) -> Result<About, AppError> {
        (**self).save_about(about).await
    }
}

impl SqlxContentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContentRepo { pool }
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepo {
    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        // Keep writing to the existing row when the caller did not send its id.
        let id = match profile.id {
            Some(id) => Some(id),
            None => self.get_profile().await?.and_then(|p| p.id),
        };

        let saved = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                id, title, subtitle, description, badge_text, profile_image_url, resume_url,
                email, linkedin_url, github_url, twitter_url, location
            )
            VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                description = EXCLUDED.description,
                badge_text = EXCLUDED.badge_text,
                profile_image_url = EXCLUDED.profile_image_url,
                resume_url = EXCLUDED.resume_url,
                email = EXCLUDED.email,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                twitter_url = EXCLUDED.twitter_url,
                location = EXCLUDED.location,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.title)
        .bind(&profile.subtitle)
        .bind(&profile.description)
        .bind(&profile.badge_text)
        .bind(&profile.profile_image_url)
        .bind(&profile.resume_url)
        .bind(&profile.email)
        .bind(&profile.linkedin_url)
        .bind(&profile.github_url)
        .bind(&profile.twitter_url)
        .bind(&profile.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn get_about(&self) -> Result<Option<About>, AppError> {
        let about = sqlx::query_as::<_, About>("SELECT * FROM about ORDER BY created_at ASC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(about)
    }

    async fn save_about(&self, about: &About) -> Result<About, AppError> {
        let id = match about.id {
            Some(id) => Some(id),
            None => self.get_about().await?.and_then(|a| a.id),
        };

        let saved = sqlx::query_as::<_, About>(
            r#"
            INSERT INTO about (id, content_en, content_es)
            VALUES (COALESCE($1, gen_random_uuid()), $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                content_en = EXCLUDED.content_en,
                content_es = EXCLUDED.content_es,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&about.content_en)
        .bind(&about.content_es)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
