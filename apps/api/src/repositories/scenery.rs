//! Scenery record repository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::models::SceneryRecord;

const SCENERY_COLUMNS: &str = r#"
    record_id, id, user_id, user_email,
    image_prompt, image_url, audio_prompt, audio_url,
    idioms, created_at, updated_at
"#;

/// Where finished scenery records go
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert `record` and return it as stored
    async fn insert(&self, record: &SceneryRecord) -> Result<SceneryRecord, sqlx::Error>;
}

/// Postgres-backed record store
#[derive(Clone)]
pub struct SceneryRepository {
    pool: PgPool,
}

impl SceneryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SceneryRepository {
    #[instrument(skip(self, record), fields(correlation_id = %record.id, user_id = %record.user_id))]
    async fn insert(&self, record: &SceneryRecord) -> Result<SceneryRecord, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO scenery_records (
                record_id, id, user_id, user_email,
                image_prompt, image_url, audio_prompt, audio_url,
                idioms, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            SCENERY_COLUMNS
        );

        sqlx::query_as::<_, SceneryRecord>(&query)
            .bind(record.record_id)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.user_email)
            .bind(&record.image_prompt)
            .bind(&record.image_url)
            .bind(&record.audio_prompt)
            .bind(&record.audio_url)
            .bind(&record.idioms)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
    }
}
