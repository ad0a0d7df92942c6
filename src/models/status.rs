use sqlx::FromRow;

/// One row of the host status query.
///
/// Status columns are `None` when the host has no `icinga_hoststatus` row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HostRow {
    pub host_name: String,
    pub state: Option<i32>,
    pub state_type: Option<i32>,
    pub downtime_depth: Option<i32>,
    pub acknowledgement: Option<i32>,
    pub output: Option<String>,
    pub long_output: Option<String>,
}

/// One row of the service status query.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ServiceRow {
    pub host_name: String,
    pub service_name: String,
    pub state: Option<i32>,
    pub state_type: Option<i32>,
    pub downtime_depth: Option<i32>,
    pub acknowledgement: Option<i32>,
    pub output: Option<String>,
    pub long_output: Option<String>,
}
