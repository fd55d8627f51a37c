// ABOUTME: Error kinds surfaced by a dump invocation
// ABOUTME: Every variant is terminal for the dump that produced it

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::dump::Dumper`] and the dialect adapters.
///
/// Driver failures are carried as `anyhow::Error` sources so the original
/// message from mysql_async or tokio-postgres reaches the caller unchanged.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Dump '{}' already exists", .0.display())]
    PathAlreadyExists(PathBuf),

    #[error("Invalid directory '{}'", .0.display())]
    DirectoryInvalid(PathBuf),

    #[error("Invalid dump name pattern '{0}'")]
    InvalidNamePattern(String),

    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Failed to read server version: {0}")]
    ServerVersionUnreadable(#[source] anyhow::Error),

    #[error("Failed to list tables: {0}")]
    TableEnumerationFailed(#[source] anyhow::Error),

    /// DDL introspection echoed a different table than the one requested.
    #[error("Returned table '{returned}' is not the same as requested table '{requested}'")]
    ColumnMismatch { requested: String, returned: String },

    #[error("Table '{0}' returned a row without columns")]
    NoColumnsInTable(String),

    #[error("Failed to read rows from table '{table}': {source}")]
    RowScanFailed {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read table definition for '{table}': {source}")]
    DdlQueryFailed {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read sequence '{name}': {source}")]
    SequenceLookupFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to install table definition procedure: {0}")]
    ProcedureInstallFailed(#[source] anyhow::Error),

    #[error("Failed to drop table definition procedure: {0}")]
    ProcedureDropFailed(#[source] anyhow::Error),

    #[error("Failed to write dump: {0}")]
    TemplateRenderFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DumpError {
    pub(crate) fn row_scan(table: &str, source: anyhow::Error) -> Self {
        DumpError::RowScanFailed {
            table: table.to_string(),
            source,
        }
    }

    pub(crate) fn ddl(table: &str, source: anyhow::Error) -> Self {
        DumpError::DdlQueryFailed {
            table: table.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
