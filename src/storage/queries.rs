//! SQL for the Icinga IDO schema.
//!
//! Statements are assembled only from the fixed fragments in this module;
//! request values always travel as bound parameters. Filters are `EXISTS`
//! subqueries so duplicate membership or custom variable rows (IDO keeps
//! both config_type 0 and 1 copies) never repeat an object.

use crate::services::filter::{ObjectFilter, ObjectKind};

/// Single-row marker written by the monitoring engine on every status dump.
///
/// The cast accepts both `timestamp` and `timestamptz` columns; sqlx sessions
/// run with `TimeZone=UTC`, so the result is a naive UTC value either way.
pub const PROGRAM_STATUS: &str =
    "SELECT CAST(status_update_time AS TIMESTAMP) AS status_update_time FROM icinga_programstatus";

/// SQLite has no zoned timestamps, and casting to `TIMESTAMP` there means
/// NUMERIC affinity, which would truncate the stored text to its year.
#[cfg(feature = "sqlite")]
pub const PROGRAM_STATUS_SQLITE: &str = "SELECT status_update_time FROM icinga_programstatus";

const HOST_COLUMNS: &str = "
    SELECT
        COALESCE(o.name1, '') AS host_name,
        CAST(s.current_state AS INTEGER) AS state,
        CAST(s.state_type AS INTEGER) AS state_type,
        CAST(s.scheduled_downtime_depth AS INTEGER) AS downtime_depth,";

const SERVICE_COLUMNS: &str = "
    SELECT
        COALESCE(o.name1, '') AS host_name,
        COALESCE(o.name2, '') AS service_name,
        CAST(s.current_state AS INTEGER) AS state,
        CAST(s.state_type AS INTEGER) AS state_type,
        CAST(s.scheduled_downtime_depth AS INTEGER) AS downtime_depth,";

const ACKNOWLEDGEMENT_COLUMN: &str =
    "\n        CAST(s.problem_has_been_acknowledged AS INTEGER) AS acknowledgement,";

const NO_ACKNOWLEDGEMENT_COLUMN: &str = "\n        CAST(NULL AS INTEGER) AS acknowledgement,";

const OUTPUT_COLUMNS: &str = "
        s.output AS output,
        s.long_output AS long_output";

const HOST_SOURCE: &str = "
    FROM icinga_objects o
    LEFT JOIN icinga_hoststatus s ON s.host_object_id = o.object_id";

const SERVICE_SOURCE: &str = "
    FROM icinga_objects o
    LEFT JOIN icinga_servicestatus s ON s.service_object_id = o.object_id";

const HOST_WHERE: &str = "
    WHERE o.objecttype_id = 1 AND o.is_active = 1";

const SERVICE_WHERE: &str = "
    WHERE o.objecttype_id = 2 AND o.is_active = 1";

pub(crate) const CUSTOM_VARIABLE_PREDICATE: &str = "
      AND EXISTS (
          SELECT 1 FROM icinga_customvariables cv
          WHERE cv.object_id = o.object_id AND cv.varname = $1 AND cv.varvalue = $2
      )";

pub(crate) const HOSTGROUP_PREDICATE: &str = "
      AND EXISTS (
          SELECT 1 FROM icinga_hostgroup_members gm
          JOIN icinga_hostgroups g ON g.hostgroup_id = gm.hostgroup_id
          JOIN icinga_objects gobj ON gobj.object_id = g.hostgroup_object_id
          WHERE gm.host_object_id = o.object_id
            AND gobj.objecttype_id = 3 AND gobj.name1 = $1
      )";

pub(crate) const SERVICEGROUP_PREDICATE: &str = "
      AND EXISTS (
          SELECT 1 FROM icinga_servicegroup_members gm
          JOIN icinga_servicegroups g ON g.servicegroup_id = gm.servicegroup_id
          JOIN icinga_objects gobj ON gobj.object_id = g.servicegroup_object_id
          WHERE gm.service_object_id = o.object_id
            AND gobj.objecttype_id = 4 AND gobj.name1 = $1
      )";

/// Which optional columns the connected IDO schema provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    pub track_acknowledgements: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            track_acknowledgements: true,
        }
    }
}

/// Build the status statement for one object kind and filter shape.
pub fn status_statement(kind: ObjectKind, filter: &ObjectFilter, schema: SchemaOptions) -> String {
    let (columns, source, base_where) = match kind {
        ObjectKind::Host => (HOST_COLUMNS, HOST_SOURCE, HOST_WHERE),
        ObjectKind::Service => (SERVICE_COLUMNS, SERVICE_SOURCE, SERVICE_WHERE),
    };
    let acknowledgement = if schema.track_acknowledgements {
        ACKNOWLEDGEMENT_COLUMN
    } else {
        NO_ACKNOWLEDGEMENT_COLUMN
    };
    let fragments = filter.fragments(kind);

    [
        columns,
        acknowledgement,
        OUTPUT_COLUMNS,
        source,
        base_where,
        fragments.predicate,
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_status_casts_marker_to_naive_timestamp() {
        assert!(PROGRAM_STATUS.contains("CAST(status_update_time AS TIMESTAMP)"));
        assert!(PROGRAM_STATUS.contains("AS status_update_time"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_program_status_reads_column_as_stored() {
        assert!(!PROGRAM_STATUS_SQLITE.contains("CAST"));
    }

    #[test]
    fn test_object_names_are_coalesced() {
        for kind in [ObjectKind::Host, ObjectKind::Service] {
            let sql = status_statement(kind, &ObjectFilter::Unfiltered, SchemaOptions::default());
            assert!(sql.contains("COALESCE(o.name1, '') AS host_name"));
        }
    }

    fn placeholders(sql: &str) -> usize {
        (1..=9).filter(|n| sql.contains(&format!("${}", n))).count()
    }

    #[test]
    fn test_unfiltered_host_statement() {
        let sql = status_statement(
            ObjectKind::Host,
            &ObjectFilter::Unfiltered,
            SchemaOptions::default(),
        );

        assert!(sql.contains("LEFT JOIN icinga_hoststatus"));
        assert!(sql.contains("o.objecttype_id = 1"));
        assert!(sql.contains("problem_has_been_acknowledged"));
        assert!(!sql.contains("icinga_customvariables"));
        assert_eq!(placeholders(&sql), 0);
    }

    #[test]
    fn test_service_statement_without_acknowledgement_column() {
        let sql = status_statement(
            ObjectKind::Service,
            &ObjectFilter::Unfiltered,
            SchemaOptions {
                track_acknowledgements: false,
            },
        );

        assert!(sql.contains("LEFT JOIN icinga_servicestatus"));
        assert!(sql.contains("o.objecttype_id = 2"));
        assert!(sql.contains("CAST(NULL AS INTEGER) AS acknowledgement"));
        assert!(!sql.contains("problem_has_been_acknowledged"));
    }

    #[test]
    fn test_group_filter_is_an_exists_predicate() {
        let filter = ObjectFilter::Group {
            name: "prod".to_string(),
        };
        let sql = status_statement(ObjectKind::Service, &filter, SchemaOptions::default());

        let where_clause = sql.find("o.objecttype_id = 2").unwrap();
        let exists = sql.find("AND EXISTS").unwrap();
        let predicate = sql.find("gobj.name1 = $1").unwrap();
        assert!(where_clause < exists);
        assert!(exists < predicate);
        assert!(sql.contains("gm.service_object_id = o.object_id"));
        // nothing but the status table is joined onto the object row
        let outer = &sql[..where_clause];
        assert_eq!(outer.matches("JOIN").count(), 1);
        assert_eq!(placeholders(&sql), filter.binds().len());
    }

    #[test]
    fn test_custom_variable_statement_binds_two_values() {
        let filter = ObjectFilter::CustomVariable {
            name: "env".to_string(),
            value: "prod".to_string(),
        };
        let sql = status_statement(ObjectKind::Host, &filter, SchemaOptions::default());

        assert!(sql.contains("SELECT 1 FROM icinga_customvariables cv"));
        assert!(sql.contains("cv.object_id = o.object_id"));
        assert_eq!(placeholders(&sql), 2);
        assert_eq!(filter.binds(), vec!["env", "prod"]);
    }
}
