//! Storage module.
//!
//! Read access to the Icinga IDO database. Handlers only see the
//! `MonitoringDb` / `MonitoringConn` pair; the sqlx pools implement them.

pub mod queries;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::pool::PoolConnection;

use crate::errors::{ApiError, Result};
use crate::models::{HostRow, ServiceRow};
use crate::services::filter::{ObjectFilter, ObjectKind};

pub use queries::SchemaOptions;

/// Source of connections to the monitoring database.
#[async_trait]
pub trait MonitoringDb: Send + Sync + 'static {
    type Conn: MonitoringConn;

    /// Check out one connection for the lifetime of a request.
    ///
    /// The connection goes back to the pool when the returned value is dropped.
    async fn acquire(&self) -> Result<Self::Conn>;
}

/// Reads issued over a single checked-out connection.
#[async_trait]
pub trait MonitoringConn: Send {
    /// `status_update_time` of the program status row, if there is one
    async fn status_update_time(&mut self) -> Result<Option<NaiveDateTime>>;

    async fn host_rows(
        &mut self,
        filter: &ObjectFilter,
        schema: SchemaOptions,
    ) -> Result<Vec<HostRow>>;

    async fn service_rows(
        &mut self,
        filter: &ObjectFilter,
        schema: SchemaOptions,
    ) -> Result<Vec<ServiceRow>>;
}

/// Missing tables or columns mean the IDO schema is not what we expect.
fn classify_error(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        // undefined_table, undefined_column
        let postgres_schema_error = matches!(db_err.code().as_deref(), Some("42P01" | "42703"));
        let sqlite_schema_error = db_err.message().starts_with("no such table")
            || db_err.message().starts_with("no such column");
        if postgres_schema_error || sqlite_schema_error {
            return ApiError::Configuration(db_err.message().to_string());
        }
    }
    ApiError::Retrieval(err)
}

macro_rules! impl_monitoring_db {
    ($db:ty, $program_status:expr) => {
        #[async_trait]
        impl MonitoringDb for sqlx::Pool<$db> {
            type Conn = PoolConnection<$db>;

            async fn acquire(&self) -> Result<Self::Conn> {
                Ok(sqlx::Pool::acquire(self).await?)
            }
        }

        #[async_trait]
        impl MonitoringConn for PoolConnection<$db> {
            async fn status_update_time(&mut self) -> Result<Option<NaiveDateTime>> {
                let marker: Option<(NaiveDateTime,)> = sqlx::query_as($program_status)
                    .fetch_optional(&mut **self)
                    .await
                    .map_err(classify_error)?;
                Ok(marker.map(|(updated_at,)| updated_at))
            }

            async fn host_rows(
                &mut self,
                filter: &ObjectFilter,
                schema: SchemaOptions,
            ) -> Result<Vec<HostRow>> {
                let sql = queries::status_statement(ObjectKind::Host, filter, schema);
                let mut query = sqlx::query_as::<$db, HostRow>(&sql);
                for value in filter.binds() {
                    query = query.bind(value);
                }
                query.fetch_all(&mut **self).await.map_err(classify_error)
            }

            async fn service_rows(
                &mut self,
                filter: &ObjectFilter,
                schema: SchemaOptions,
            ) -> Result<Vec<ServiceRow>> {
                let sql = queries::status_statement(ObjectKind::Service, filter, schema);
                let mut query = sqlx::query_as::<$db, ServiceRow>(&sql);
                for value in filter.binds() {
                    query = query.bind(value);
                }
                query.fetch_all(&mut **self).await.map_err(classify_error)
            }
        }
    };
}

impl_monitoring_db!(sqlx::Postgres, queries::PROGRAM_STATUS);

#[cfg(feature = "sqlite")]
impl_monitoring_db!(sqlx::Sqlite, queries::PROGRAM_STATUS_SQLITE);
