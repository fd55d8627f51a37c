// ABOUTME: In-memory model of one dump: header, ordered table records and footer stamp
// ABOUTME: Built once per dump invocation and discarded after rendering

use std::fmt;

/// Version stamped into the dump banner.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A PostgreSQL sequence as read from `information_schema.sequences`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDefinition {
    pub schema: String,
    pub name: String,
    pub increment: i64,
    pub start: i64,
    pub min: i64,
    pub max: i64,
}

impl fmt::Display for SequenceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE SEQUENCE {}.{}\n\tINCREMENT {}\n\tSTART {}\n\tMINVALUE {}\n\tMAXVALUE {}\n\tCACHE 1;\n\n",
            self.schema, self.name, self.increment, self.start, self.min, self.max
        )
    }
}

/// Everything emitted for a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub name: String,
    pub ddl: String,
    /// Always empty for MySQL-family servers.
    pub sequences: Vec<SequenceDefinition>,
    /// Comma-joined tuple literals, empty when the table has no rows.
    pub values: String,
}

impl TableRecord {
    /// DDL without trailing semicolons, so templates can terminate it themselves.
    pub fn statement(&self) -> &str {
        self.ddl.trim_end().trim_end_matches(';').trim_end()
    }

    pub fn has_rows(&self) -> bool {
        !self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpDocument {
    pub format_version: String,
    pub server_version: String,
    /// Sequences rendered once before any table (PostgreSQL, owned attribution).
    pub sequences: Vec<SequenceDefinition>,
    /// Resolution order, never sorted.
    pub tables: Vec<TableRecord>,
    pub completed_at: String,
}

impl DumpDocument {
    pub fn new(server_version: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            server_version: server_version.into(),
            sequences: Vec::new(),
            tables: Vec::new(),
            completed_at: String::new(),
        }
    }

    /// Record the completion time. Called after every table record is built.
    pub fn stamp(&mut self) {
        self.completed_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.f %z")
            .to_string();
    }
}
