use actix_web::{HttpResponse, web};
use tracing::{error, info};

use crate::errors::{ApiError, Result};
use crate::models::ObjectList;
use crate::services::filter::{HostQuery, ObjectFilter, ObjectKind, ServiceQuery};
use crate::services::status::load_objects;
use crate::state::AppState;
use crate::storage::MonitoringDb;

// GET /api/v1/objects/hosts
pub async fn list_hosts<D: MonitoringDb>(
    data: web::Data<AppState<D>>,
    query: web::Query<HostQuery>,
) -> Result<HttpResponse> {
    let filter = ObjectFilter::from_params(query.into_inner().into());
    respond(&data, ObjectKind::Host, filter).await
}

// GET /api/v1/objects/services
pub async fn list_services<D: MonitoringDb>(
    data: web::Data<AppState<D>>,
    query: web::Query<ServiceQuery>,
) -> Result<HttpResponse> {
    let filter = ObjectFilter::from_params(query.into_inner().into());
    respond(&data, ObjectKind::Service, filter).await
}

async fn respond<D: MonitoringDb>(
    data: &AppState<D>,
    kind: ObjectKind,
    filter: ObjectFilter,
) -> Result<HttpResponse> {
    info!(
        kind = kind.as_str(),
        filter = filter.describe(),
        "Request for object status"
    );

    let results = load_objects(&data.db, kind, &filter, data.schema)
        .await
        .inspect_err(|e| {
            if !matches!(e, ApiError::StaleFeed { .. }) {
                error!(kind = kind.as_str(), "Status request failed: {}", e);
            }
        })?;

    info!("Returning {} {} objects", results.len(), kind.as_str());
    Ok(HttpResponse::Ok().json(ObjectList { results }))
}
