use std::sync::Arc;

use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::{
    entities::contact_me::{ContactMeFormInsert, ContactMeMessage, MessageFilter},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactMeRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactMeRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<Uuid, AppError>;
    async fn get_contact_message_by_id(&self, id: Uuid) -> Result<ContactMeMessage, AppError>;
    /// Newest first.
    async fn list_contact_messages(&self, filter: MessageFilter) -> Result<Vec<ContactMeMessage>, AppError>;
    async fn count_contact_messages(&self, filter: MessageFilter) -> Result<i64, AppError>;
    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<(), AppError>;
    async fn delete_contact_message(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl<T: ContactMeRepository + ?Sized> ContactMeRepository for Arc<T> {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<Uuid, AppError> {
        (**self).create_contact_message(msg).await
    }

    async fn get_contact_message_by_id(&self, id: Uuid) -> Result<ContactMeMessage, AppError> {
        (**self).get_contact_message_by_id(id).await
    }

    async fn list_contact_messages(&self, filter: MessageFilter) -> Result<Vec<ContactMeMessage>, AppError> {
        (**self).list_contact_messages(filter).await
    }

    async fn count_contact_messages(&self, filter: MessageFilter) -> Result<i64, AppError> {
        (**self).count_contact_messages(filter).await
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<(), AppError> {
        (**self).set_read(id, is_read).await
    }

    async fn delete_contact_message(&self, id: Uuid) -> Result<(), AppError> {
        (**self).delete_contact_message(id).await
    }
}

impl SqlxContactMeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactMeRepo { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, sqlx::Postgres>, filter: MessageFilter) {
    if let Some(is_read) = filter.is_read() {
        qb.push(" WHERE is_read = ").push_bind(is_read);
    }
}

#[async_trait]
impl ContactMeRepository for SqlxContactMeRepo {
    async fn create_contact_message(&self, msg: &ContactMeFormInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_contact_message_by_id(&self, id: Uuid) -> Result<ContactMeMessage, AppError> {
        sqlx::query_as::<_, ContactMeMessage>("SELECT * FROM contact_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Contact message not found".into()))
    }

    async fn list_contact_messages(&self, filter: MessageFilter) -> Result<Vec<ContactMeMessage>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM contact_messages");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");

        let messages = qb
            .build_query_as::<ContactMeMessage>()
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    async fn count_contact_messages(&self, filter: MessageFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM contact_messages");
        push_filter(&mut qb, filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE contact_messages SET is_read = $2 WHERE id = $1")
            .bind(id)
            .bind(is_read)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".into()));
        }
        Ok(())
    }

    async fn delete_contact_message(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".into()));
        }
        Ok(())
    }
}
