//! Status retrieval pipeline: freshness check, filtered query, normalization

use tracing::{debug, instrument};

use crate::errors::Result;
use crate::models::NormalizedEntity;
use crate::services::freshness::check_freshness;
use crate::services::filter::{ObjectFilter, ObjectKind};
use crate::storage::{MonitoringConn, MonitoringDb, SchemaOptions};

pub async fn fetch_hosts<C>(
    conn: &mut C,
    filter: &ObjectFilter,
    schema: SchemaOptions,
) -> Result<Vec<NormalizedEntity>>
where
    C: MonitoringConn + ?Sized,
{
    let rows = conn.host_rows(filter, schema).await?;
    Ok(rows.into_iter().map(NormalizedEntity::from).collect())
}

pub async fn fetch_services<C>(
    conn: &mut C,
    filter: &ObjectFilter,
    schema: SchemaOptions,
) -> Result<Vec<NormalizedEntity>>
where
    C: MonitoringConn + ?Sized,
{
    let rows = conn.service_rows(filter, schema).await?;
    Ok(rows.into_iter().map(NormalizedEntity::from).collect())
}

/// Run one full request against the monitoring database.
///
/// The connection is held for the freshness check and the status query and
/// is returned to the pool when this function exits, on success or error.
#[instrument(skip(db, filter, schema), fields(filter_kind = filter.describe()))]
pub async fn load_objects<D>(
    db: &D,
    kind: ObjectKind,
    filter: &ObjectFilter,
    schema: SchemaOptions,
) -> Result<Vec<NormalizedEntity>>
where
    D: MonitoringDb,
{
    let mut conn = db.acquire().await?;

    check_freshness(&mut conn).await?;

    let entities = match kind {
        ObjectKind::Host => fetch_hosts(&mut conn, filter, schema).await?,
        ObjectKind::Service => fetch_services(&mut conn, filter, schema).await?,
    };

    debug!("Loaded {} {} objects", entities.len(), kind.as_str());
    Ok(entities)
}
