pub mod entity;
pub mod status;

pub use entity::{
    EntityAttrs, EntityType, LastCheckResult, NormalizedEntity, ObjectList, normalize_output,
};
pub use status::{HostRow, ServiceRow};
