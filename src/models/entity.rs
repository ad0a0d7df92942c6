use serde::{Deserialize, Serialize};

use super::status::{HostRow, ServiceRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Host,
    Service,
}

/// Client-facing shape of a host or service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub attrs: EntityAttrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAttrs {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    pub state: Option<i32>,
    pub state_type: Option<i32>,
    pub downtime_depth: Option<i32>,
    pub acknowledgement: Option<i32>,
    pub last_check_result: LastCheckResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastCheckResult {
    pub output: String,
}

/// Wrapper matching the `{"results": [...]}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectList {
    pub results: Vec<NormalizedEntity>,
}

/// Rewrites literal `\n` escapes (backslash, `n`) into real newlines.
pub fn expand_escaped_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Joins the short and long plugin output the way dashboards expect.
///
/// Missing columns count as empty text.
pub fn normalize_output(output: Option<&str>, long_output: Option<&str>) -> String {
    let short = output.unwrap_or_default();
    let long = expand_escaped_newlines(long_output.unwrap_or_default());
    format!("{}\n{}", short, long)
}

impl From<HostRow> for NormalizedEntity {
    fn from(row: HostRow) -> Self {
        let output = normalize_output(row.output.as_deref(), row.long_output.as_deref());
        Self {
            entity_type: EntityType::Host,
            attrs: EntityAttrs {
                display_name: row.host_name,
                host_name: None,
                state: row.state,
                state_type: row.state_type,
                downtime_depth: row.downtime_depth,
                acknowledgement: row.acknowledgement,
                last_check_result: LastCheckResult { output },
            },
        }
    }
}

impl From<ServiceRow> for NormalizedEntity {
    fn from(row: ServiceRow) -> Self {
        let output = normalize_output(row.output.as_deref(), row.long_output.as_deref());
        Self {
            entity_type: EntityType::Service,
            attrs: EntityAttrs {
                display_name: row.service_name,
                host_name: Some(row.host_name),
                state: row.state,
                state_type: row.state_type,
                downtime_depth: row.downtime_depth,
                acknowledgement: row.acknowledgement,
                last_check_result: LastCheckResult { output },
            },
        }
    }
}
