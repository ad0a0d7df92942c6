pub mod objects;

use actix_web::web;

use crate::services::health::health_check;
use crate::storage::MonitoringDb;

/// Register every route; `AppState<D>` must be provided as app data.
pub fn configure<D: MonitoringDb>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1/objects")
            .route("/hosts", web::get().to(objects::list_hosts::<D>))
            .route("/services", web::get().to(objects::list_services::<D>)),
    );
}
