pub mod filter;
pub mod freshness;
pub mod health;
pub mod status;

pub use filter::{FilterParams, HostQuery, ObjectFilter, ObjectKind, ServiceQuery};
pub use freshness::{FRESHNESS_THRESHOLD_SECS, check_freshness, evaluate_freshness};
pub use status::{fetch_hosts, fetch_services, load_objects};
