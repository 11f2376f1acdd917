use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{CategoryStore, CommentStore, ComplaintStore, ProfileStore};
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::comments::models::{Comment, CommentRecord, NewComment};
use crate::features::complaints::models::{
    Complaint, ComplaintFilter, ComplaintRecord, ComplaintStatus, NewComplaint, StatusWrite,
};
use crate::features::profiles::models::Profile;

const COMPLAINT_COLUMNS: &str = "id, title, description, category_id, user_id, municipality, ward, \
     priority, status, location_lat, location_lng, version, created_at, updated_at";

const COMPLAINT_RECORD_SELECT: &str = "SELECT \
     c.id, c.title, c.description, c.category_id, c.user_id, c.municipality, c.ward, \
     c.priority, c.status, c.location_lat, c.location_lng, c.version, c.created_at, c.updated_at, \
     cat.name AS category_name, p.full_name AS author_name \
     FROM complaints c \
     LEFT JOIN categories cat ON cat.id = c.category_id \
     LEFT JOIN profiles p ON p.id = c.user_id";

/// Postgres-backed store for all four record types
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// ILIKE pattern matching `term` literally anywhere in the column
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_complaint_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ComplaintFilter) {
    qb.push(" WHERE TRUE");

    if let Some(status) = filter.status {
        qb.push(" AND c.status = ").push_bind(status);
    }
    if let Some(excluded) = filter.exclude_status {
        qb.push(" AND c.status <> ").push_bind(excluded);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND c.category_id = ").push_bind(category_id);
    }
    if let Some(ref search) = filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (c.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, full_name, role, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("get profile"))
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list categories"))
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get category"))
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE lower(btrim(name)) = lower(btrim($1))
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("get category by name"))
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create category"))
    }

    async fn delete_category(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete category"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ComplaintStore for PgStore {
    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
    ) -> Result<(Vec<ComplaintRecord>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM complaints c");
        push_complaint_filters(&mut count_query, filter);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count complaints"))?;

        let mut query = QueryBuilder::<Postgres>::new(COMPLAINT_RECORD_SELECT);
        push_complaint_filters(&mut query, filter);
        query
            .push(" ORDER BY c.created_at DESC, c.id")
            .push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = query
            .build_query_as::<ComplaintRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list complaints"))?;

        Ok((rows, total))
    }

    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>> {
        let sql = format!("{} WHERE c.id = $1", COMPLAINT_RECORD_SELECT);
        sqlx::query_as::<_, ComplaintRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get complaint"))
    }

    async fn insert_complaint(&self, data: &NewComplaint) -> Result<Complaint> {
        let sql = format!(
            r#"
            INSERT INTO complaints (
                title, description, category_id, user_id, municipality, ward,
                priority, status, location_lat, location_lng
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'NEW', $8, $9)
            RETURNING {}
            "#,
            COMPLAINT_COLUMNS
        );

        sqlx::query_as::<_, Complaint>(&sql)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category_id)
            .bind(data.user_id)
            .bind(&data.municipality)
            .bind(&data.ward)
            .bind(data.priority)
            .bind(data.location_lat)
            .bind(data.location_lng)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create complaint"))
    }

    async fn update_complaint_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        expected_version: Option<i32>,
    ) -> Result<StatusWrite> {
        let sql = format!(
            r#"
            UPDATE complaints
            SET status = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND ($3::INTEGER IS NULL OR version = $3)
            RETURNING {}
            "#,
            COMPLAINT_COLUMNS
        );

        let updated = sqlx::query_as::<_, Complaint>(&sql)
            .bind(id)
            .bind(status)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update complaint status"))?;

        if let Some(complaint) = updated {
            return Ok(StatusWrite::Updated(complaint));
        }

        let current_version =
            sqlx::query_scalar::<_, i32>("SELECT version FROM complaints WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("read complaint version"))?;

        Ok(match current_version {
            Some(current_version) => StatusWrite::VersionConflict { current_version },
            None => StatusWrite::NotFound,
        })
    }

    async fn count_complaints_in_category(&self, category_id: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM complaints WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count complaints in category"))
    }

    async fn sample_complaint_ids(&self, limit: i64) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM complaints LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("probe complaints"))
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn list_comments(&self, complaint_id: Uuid) -> Result<Vec<CommentRecord>> {
        sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT cm.id, cm.complaint_id, cm.author_id, cm.body, cm.created_at,
                   p.full_name AS author_name
            FROM comments cm
            LEFT JOIN profiles p ON p.id = cm.author_id
            WHERE cm.complaint_id = $1
            ORDER BY cm.created_at ASC, cm.id ASC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list comments"))
    }

    async fn insert_comment(&self, data: &NewComment) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, complaint_id, author_id, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, complaint_id, author_id, body, created_at
            "#,
        )
        // v7 ids sort by creation, breaking created_at ties in the thread order
        .bind(Uuid::now_v7())
        .bind(data.complaint_id)
        .bind(data.author_id)
        .bind(&data.body)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create comment"))
    }
}
