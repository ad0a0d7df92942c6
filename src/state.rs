use crate::storage::{MonitoringDb, SchemaOptions};

// App state
pub struct AppState<D: MonitoringDb> {
    pub db: D,
    pub schema: SchemaOptions,
}

impl<D: MonitoringDb> AppState<D> {
    pub fn new(db: D, schema: SchemaOptions) -> Self {
        Self { db, schema }
    }
}
