//! Optional filters for the object endpoints

use serde::Deserialize;
use tracing::debug;

use crate::storage::queries::{
    CUSTOM_VARIABLE_PREDICATE, HOSTGROUP_PREDICATE, SERVICEGROUP_PREDICATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Host,
    Service,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Host => "host",
            ObjectKind::Service => "service",
        }
    }
}

/// Query string accepted by `/api/v1/objects/hosts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostQuery {
    pub host_filter_custom_varname: Option<String>,
    pub host_filter_custom_varvalue: Option<String>,
    pub hostgroup: Option<String>,
}

/// Query string accepted by `/api/v1/objects/services`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceQuery {
    pub service_filter_custom_varname: Option<String>,
    pub service_filter_custom_varvalue: Option<String>,
    pub servicegroup: Option<String>,
}

/// Filter parameters with the endpoint prefix stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub varname: Option<String>,
    pub varvalue: Option<String>,
    pub group: Option<String>,
}

impl From<HostQuery> for FilterParams {
    fn from(query: HostQuery) -> Self {
        Self {
            varname: query.host_filter_custom_varname,
            varvalue: query.host_filter_custom_varvalue,
            group: query.hostgroup,
        }
    }
}

impl From<ServiceQuery> for FilterParams {
    fn from(query: ServiceQuery) -> Self {
        Self {
            varname: query.service_filter_custom_varname,
            varvalue: query.service_filter_custom_varvalue,
            group: query.servicegroup,
        }
    }
}

/// Shape of the status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectFilter {
    Unfiltered,
    CustomVariable { name: String, value: String },
    Group { name: String },
}

/// Extra SQL for one filter shape.
///
/// `predicate` is appended after the base conditions and starts with `AND`.
/// It only references the outer object row, so it never multiplies rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFragments<'a> {
    pub predicate: &'static str,
    pub binds: Vec<&'a str>,
}

impl ObjectFilter {
    /// Pick the filter for a request.
    ///
    /// A complete custom variable pair wins over a group name. Half a pair
    /// is ignored rather than rejected.
    pub fn from_params(params: FilterParams) -> Self {
        match (params.varname, params.varvalue, params.group) {
            (Some(name), Some(value), _) => ObjectFilter::CustomVariable { name, value },
            (varname, varvalue, group) => {
                if varname.is_some() || varvalue.is_some() {
                    debug!(
                        has_varname = varname.is_some(),
                        has_varvalue = varvalue.is_some(),
                        "Incomplete custom variable filter, ignoring it"
                    );
                }
                match group {
                    Some(name) => ObjectFilter::Group { name },
                    None => ObjectFilter::Unfiltered,
                }
            }
        }
    }

    pub fn fragments(&self, kind: ObjectKind) -> FilterFragments<'_> {
        match self {
            ObjectFilter::Unfiltered => FilterFragments {
                predicate: "",
                binds: Vec::new(),
            },
            ObjectFilter::CustomVariable { name, value } => FilterFragments {
                predicate: CUSTOM_VARIABLE_PREDICATE,
                binds: vec![name.as_str(), value.as_str()],
            },
            ObjectFilter::Group { name } => {
                let predicate = match kind {
                    ObjectKind::Host => HOSTGROUP_PREDICATE,
                    ObjectKind::Service => SERVICEGROUP_PREDICATE,
                };
                FilterFragments {
                    predicate,
                    binds: vec![name.as_str()],
                }
            }
        }
    }

    /// Values for the statement placeholders, in order.
    pub fn binds(&self) -> Vec<&str> {
        // Bind order does not depend on the object kind.
        self.fragments(ObjectKind::Host).binds
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ObjectFilter::Unfiltered => "none",
            ObjectFilter::CustomVariable { .. } => "custom_variable",
            ObjectFilter::Group { .. } => "group",
        }
    }
}
