use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, query_builder::Separated, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    constants::ORDINAL_COLUMN,
    entities::{
        award::Award,
        certification::Certification,
        education::Education,
        entry::{Entry, EntryFlag},
        experience::Experience,
        project::Project,
        skill::{Skill, SkillCategory},
    },
    errors::AppError,
    repositories::collection::CollectionRepository,
    use_cases::reorder::OrdinalUpdate,
};

/// How an entry maps onto its table.
pub trait TableRow: Entry + for<'r> FromRow<'r, PgRow> {
    /// Writable columns, in the order [`push_values`](TableRow::push_values)
    /// binds them. `id` and the timestamps are managed by the database.
    const COLUMNS: &'static [&'static str];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>);
}

/// Generic Postgres storage for any [`TableRow`] collection.
pub struct SqlxCollectionRepo<E> {
    pool: PgPool,
    _entry: PhantomData<fn() -> E>,
}

impl<E> Clone for SqlxCollectionRepo<E> {
    fn clone(&self) -> Self {
        SqlxCollectionRepo {
            pool: self.pool.clone(),
            _entry: PhantomData,
        }
    }
}

impl<E: TableRow> SqlxCollectionRepo<E> {
    pub fn new(pool: PgPool) -> Self {
        SqlxCollectionRepo {
            pool,
            _entry: PhantomData,
        }
    }

    fn table() -> &'static str {
        E::KIND.table()
    }

    fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(format_args!(" ORDER BY {ORDINAL_COLUMN} ASC, created_at ASC"));
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("No {} entry with id {id}", E::KIND))
    }
}

#[async_trait]
impl<E: TableRow> CollectionRepository<E> for SqlxCollectionRepo<E> {
    async fn list(&self, scope: Option<Uuid>) -> Result<Vec<E>, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT * FROM {}", Self::table()));
        if let (Some(column), Some(parent)) = (E::KIND.parent_column(), scope) {
            qb.push(format_args!(" WHERE {column} = ")).push_bind(parent);
        }
        Self::push_order_by(&mut qb);

        let rows = qb.build_query_as::<E>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_visible(&self, featured_only: bool) -> Result<Vec<E>, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE is_visible = TRUE",
            Self::table()
        ));
        if featured_only && E::KIND.is_featurable() {
            qb.push(" AND is_featured = TRUE");
        }
        Self::push_order_by(&mut qb);

        let rows = qb.build_query_as::<E>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert(&self, entry: &E) -> Result<E, AppError> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            Self::table(),
            E::COLUMNS.join(", ")
        ));
        qb.push_values(std::iter::once(entry), |mut row, entry| entry.push_values(&mut row));
        qb.push(" RETURNING *");

        let saved = qb.build_query_as::<E>().fetch_one(&self.pool).await?;
        Ok(saved)
    }

    async fn upsert(&self, entry: &E) -> Result<E, AppError> {
        let id = entry
            .id()
            .ok_or_else(|| AppError::InvalidInput("Cannot update an entry without an id".into()))?;

        let assignments = E::COLUMNS
            .iter()
            .map(|column| format!("{column} = EXCLUDED.{column}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} (id, {}) ",
            Self::table(),
            E::COLUMNS.join(", ")
        ));
        qb.push_values(std::iter::once(entry), |mut row, entry| {
            row.push_bind(id);
            entry.push_values(&mut row);
        });
        qb.push(format_args!(
            " ON CONFLICT (id) DO UPDATE SET {assignments}, updated_at = NOW() RETURNING *"
        ));

        let saved = qb.build_query_as::<E>().fetch_one(&self.pool).await?;
        Ok(saved)
    }

    async fn update_ordinal(&self, id: Uuid, ordinal: i32) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET {ORDINAL_COLUMN} = $1, updated_at = NOW() WHERE id = $2",
            Self::table()
        ))
        .bind(ordinal)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    /// All writes share one transaction, so a failure leaves the stored order
    /// untouched.
    async fn apply_ordinals(&self, updates: &[OrdinalUpdate]) -> Result<usize, AppError> {
        let sql = format!(
            "UPDATE {} SET {ORDINAL_COLUMN} = $1, updated_at = NOW() WHERE id = $2",
            Self::table()
        );

        let mut tx = self.pool.begin().await?;
        for update in updates {
            let result = sqlx::query(&sql)
                .bind(update.ordinal)
                .bind(update.id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(Self::not_found(update.id));
            }
        }
        tx.commit().await?;

        Ok(updates.len())
    }

    async fn set_flag(&self, id: Uuid, flag: EntryFlag, value: bool) -> Result<(), AppError> {
        if flag == EntryFlag::Featured && !E::KIND.is_featurable() {
            return Err(AppError::InvalidInput(format!("{} cannot be featured", E::KIND)));
        }

        let result = sqlx::query(&format!(
            "UPDATE {} SET {} = $1, updated_at = NOW() WHERE id = $2",
            Self::table(),
            flag.column()
        ))
        .bind(value)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", Self::table()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn count(&self, flags: &[EntryFlag]) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE TRUE", Self::table()));
        for flag in flags {
            if *flag == EntryFlag::Featured && !E::KIND.is_featurable() {
                return Ok(0);
            }
            qb.push(format_args!(" AND {} = TRUE", flag.column()));
        }

        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }
}

impl TableRow for Project {
    const COLUMNS: &'static [&'static str] = &[
        ORDINAL_COLUMN,
        "is_featured",
        "title_en",
        "title_es",
        "description_en",
        "description_es",
        "image_url",
        "video_url",
        "demo_url",
        "repo_url",
        "technologies",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.is_featured)
            .push_bind(self.title_en.clone())
            .push_bind(self.title_es.clone())
            .push_bind(self.description_en.clone())
            .push_bind(self.description_es.clone())
            .push_bind(self.image_url.clone())
            .push_bind(self.video_url.clone())
            .push_bind(self.demo_url.clone())
            .push_bind(self.repo_url.clone())
            .push_bind(self.technologies.clone())
            .push_bind(self.is_visible);
    }
}

impl TableRow for Certification {
    const COLUMNS: &'static [&'static str] = &[
        ORDINAL_COLUMN,
        "is_featured",
        "name_en",
        "name_es",
        "description_en",
        "description_es",
        "issuer_en",
        "issuer_es",
        "logo_url",
        "certificate_url",
        "issue_date",
        "is_verified",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.is_featured)
            .push_bind(self.name_en.clone())
            .push_bind(self.name_es.clone())
            .push_bind(self.description_en.clone())
            .push_bind(self.description_es.clone())
            .push_bind(self.issuer_en.clone())
            .push_bind(self.issuer_es.clone())
            .push_bind(self.logo_url.clone())
            .push_bind(self.certificate_url.clone())
            .push_bind(self.issue_date)
            .push_bind(self.is_verified)
            .push_bind(self.is_visible);
    }
}

impl TableRow for Award {
    const COLUMNS: &'static [&'static str] = &[
        ORDINAL_COLUMN,
        "title_en",
        "title_es",
        "description_en",
        "description_es",
        "issuer_en",
        "issuer_es",
        "icon_url",
        "certificate_url",
        "date",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.title_en.clone())
            .push_bind(self.title_es.clone())
            .push_bind(self.description_en.clone())
            .push_bind(self.description_es.clone())
            .push_bind(self.issuer_en.clone())
            .push_bind(self.issuer_es.clone())
            .push_bind(self.icon_url.clone())
            .push_bind(self.certificate_url.clone())
            .push_bind(self.date)
            .push_bind(self.is_visible);
    }
}

impl TableRow for SkillCategory {
    const COLUMNS: &'static [&'static str] = &[ORDINAL_COLUMN, "name_en", "name_es", "is_visible"];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.name_en.clone())
            .push_bind(self.name_es.clone())
            .push_bind(self.is_visible);
    }
}

impl TableRow for Skill {
    const COLUMNS: &'static [&'static str] = &[
        "category_id",
        ORDINAL_COLUMN,
        "name",
        "logo_url",
        "proficiency",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.category_id)
            .push_bind(self.order)
            .push_bind(self.name.clone())
            .push_bind(self.logo_url.clone())
            .push_bind(self.proficiency)
            .push_bind(self.is_visible);
    }
}

impl TableRow for Experience {
    const COLUMNS: &'static [&'static str] = &[
        ORDINAL_COLUMN,
        "position_en",
        "position_es",
        "company_en",
        "company_es",
        "logo_url",
        "start_date",
        "end_date",
        "is_current",
        "location",
        r#""type""#,
        "description_en",
        "description_es",
        "responsibilities",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.position_en.clone())
            .push_bind(self.position_es.clone())
            .push_bind(self.company_en.clone())
            .push_bind(self.company_es.clone())
            .push_bind(self.logo_url.clone())
            .push_bind(self.start_date)
            .push_bind(self.end_date)
            .push_bind(self.is_current)
            .push_bind(self.location.clone())
            .push_bind(self.employment_type)
            .push_bind(self.description_en.clone())
            .push_bind(self.description_es.clone())
            .push_bind(self.responsibilities.clone())
            .push_bind(self.is_visible);
    }
}

impl TableRow for Education {
    const COLUMNS: &'static [&'static str] = &[
        ORDINAL_COLUMN,
        "level",
        "degree_en",
        "degree_es",
        "institution_en",
        "institution_es",
        "logo_url",
        "start_date",
        "end_date",
        "gpa",
        "show_gpa",
        "subjects",
        "is_visible",
    ];

    fn push_values<'qb, 'args: 'qb>(&self, row: &mut Separated<'qb, 'args, Postgres, &'static str>) {
        row.push_bind(self.order)
            .push_bind(self.level.clone())
            .push_bind(self.degree_en.clone())
            .push_bind(self.degree_es.clone())
            .push_bind(self.institution_en.clone())
            .push_bind(self.institution_es.clone())
            .push_bind(self.logo_url.clone())
            .push_bind(self.start_date)
            .push_bind(self.end_date)
            .push_bind(self.gpa.clone())
            .push_bind(self.show_gpa)
            .push_bind(self.subjects.clone())
            .push_bind(self.is_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders<E: TableRow>(entry: &E) -> usize {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        qb.push_values(std::iter::once(entry), |mut row, entry| entry.push_values(&mut row));
        qb.sql().matches('$').count()
    }

    #[test]
    fn every_column_gets_exactly_one_value() {
        assert_eq!(placeholders(&Project::default()), Project::COLUMNS.len());
        assert_eq!(placeholders(&Certification::default()), Certification::COLUMNS.len());
        assert_eq!(placeholders(&Award::default()), Award::COLUMNS.len());
        assert_eq!(placeholders(&SkillCategory::default()), SkillCategory::COLUMNS.len());
        assert_eq!(placeholders(&Skill::default()), Skill::COLUMNS.len());
        assert_eq!(placeholders(&Experience::default()), Experience::COLUMNS.len());
        assert_eq!(placeholders(&Education::default()), Education::COLUMNS.len());
    }

    #[test]
    fn ordinal_column_is_quoted() {
        assert!(Project::COLUMNS.contains(&r#""order""#));
    }
}
