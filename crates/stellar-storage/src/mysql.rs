use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, MySqlPool, Row};
use std::time::Duration;
use stellar_core::error::{Result, StorageError};
use stellar_core::repository::{NewUrlRecord, ReadRepository, RecordId, Repository, UrlRecord};
use stellar_core::ShortId;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Schema for the `short_urls` table. Idempotent.
pub const SHORT_URLS_DDL: &str = include_str!("../ddl/mysql/short_urls.sql");

/// Connection pool settings for [`MySqlRepository::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlSettings {
    #[builder(default = 10)]
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    #[builder(default = Duration::from_secs(5))]
    pub acquire_timeout: Duration,
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// MySQL implementation of the repository contract.
///
/// Short id uniqueness is enforced by a unique index with a binary
/// collation, so ids differing only in case are distinct. Timestamps are
/// stored as microseconds since the Unix epoch.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, &MySqlSettings::default()).await
    }

    /// Creates a repository with explicit pool settings.
    pub async fn connect_with(database_url: &str, settings: &MySqlSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SHORT_URLS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("short_urls schema is in place");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn to_micros(ts: Timestamp) -> i64 {
    ts.as_microsecond()
}

fn from_micros(column: &str, value: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(value).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{value}': {e}"))
    })
}

/// Reads one column, reporting the column name when the stored value does
/// not decode.
fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| StorageError::InvalidData(format!("cannot decode column {name}: {e}")))
}

fn row_to_record(row: &MySqlRow) -> Result<UrlRecord> {
    let id: u64 = column(row, "id")?;
    let short_id: String = column(row, "short_id")?;

    Ok(UrlRecord {
        id: RecordId(id),
        original_url: column(row, "original_url")?,
        short_id: ShortId::new_unchecked(short_id),
        created_at: from_micros("created_at", column(row, "created_at")?)?,
        last_accessed_at: from_micros("last_accessed_at", column(row, "last_accessed_at")?)?,
        click_count: column(row, "click_count")?,
        active: column(row, "active")?,
    })
}

/// Classifies driver failures by whether retrying later could help.
///
/// Row decoding goes through [`column`] and never reaches here.
fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut => {
            StorageError::Timeout("no pooled connection became available".to_string())
        }
        sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
            StorageError::Unavailable("connection pool is shut down".to_string())
        }
        sqlx::Error::Io(e) => StorageError::Unavailable(format!("mysql i/o: {e}")),
        sqlx::Error::Tls(e) => StorageError::Unavailable(format!("mysql tls: {e}")),
        sqlx::Error::Database(db) => StorageError::Query(match db.code() {
            Some(code) => format!("mysql error {code}: {}", db.message()),
            None => db.message().to_string(),
        }),
        other => StorageError::Operation(other.to_string()),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, id: &ShortId) -> Result<Option<UrlRecord>> {
        trace!(short_id = %id, "fetching record");

        let row = sqlx::query(
            r#"
            SELECT id, short_id, original_url, created_at, last_accessed_at, click_count, active
            FROM short_urls
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_urls
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, mut record: NewUrlRecord) -> Result<UrlRecord> {
        // Truncate to the stored precision so the returned record matches a later read.
        let created_at = to_micros(record.created_at);
        record.created_at = from_micros("created_at", created_at)?;

        let result = sqlx::query(
            r#"
            INSERT INTO short_urls
                (short_id, original_url, created_at, last_accessed_at, click_count, active)
            VALUES (?, ?, ?, ?, 0, TRUE)
            "#,
        )
        .bind(record.short_id.as_str())
        .bind(record.original_url.as_str())
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(record.into_record(RecordId(done.last_insert_id()))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                debug!(short_id = %record.short_id, "short id already stored");
                Err(StorageError::Conflict(record.short_id.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn increment_and_touch(&self, id: &ShortId, at: Timestamp) -> Result<UrlRecord> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // The UPDATE takes the row lock; the SELECT below reads our own
        // increment before any other transaction can apply theirs.
        let updated = sqlx::query(
            r#"
            UPDATE short_urls
            SET click_count = click_count + 1,
                last_accessed_at = GREATEST(last_accessed_at, ?)
            WHERE short_id = ?
            "#,
        )
        .bind(to_micros(at))
        .bind(id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(StorageError::NotFound(id.to_string()));
        }

        let row = sqlx::query(
            r#"
            SELECT id, short_id, original_url, created_at, last_accessed_at, click_count, active
            FROM short_urls
            WHERE short_id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let record = row_to_record(&row)?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(record)
    }
}
