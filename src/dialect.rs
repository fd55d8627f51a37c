// ABOUTME: Dialect detection and the adapter interface each server family implements
// ABOUTME: The adapter is chosen once per dump from the server version string

use crate::database::Database;
use crate::dump::document::{DumpDocument, SequenceDefinition, TableRecord};
use crate::dump::rows::stream_values;
use crate::dump::values::Escaping;
use crate::error::Result;
use crate::mysql::dialect::MySqlDialect;
use crate::postgres::dialect::PostgresDialect;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::{self, Write};

/// Substring of `SELECT version()` output that identifies a PostgreSQL server.
pub const POSTGRES_MARKER: &str = "PostgreSQL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    MySql,
    Postgres,
}

impl DialectKind {
    /// Classify a server by its version string. A plain substring test, no parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sql_dumper::dialect::DialectKind;
    /// assert_eq!(
    ///     DialectKind::detect("PostgreSQL 16.2 on x86_64-pc-linux-gnu"),
    ///     DialectKind::Postgres
    /// );
    /// assert_eq!(DialectKind::detect("10.11.6-MariaDB"), DialectKind::MySql);
    /// ```
    pub fn detect(server_version: &str) -> Self {
        if server_version.contains(POSTGRES_MARKER) {
            DialectKind::Postgres
        } else {
            DialectKind::MySql
        }
    }
}

/// Which table block a PostgreSQL sequence is emitted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceAttribution {
    /// Sequences go with the table whose column owns them; the rest are
    /// emitted once at the top of the document.
    #[default]
    Owned,
    /// Every table block repeats every sequence in the database.
    EveryTable,
}

/// Catalog access for one server family.
#[async_trait]
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    fn escaping(&self) -> Escaping;

    /// Acquire server-side resources needed for DDL extraction.
    async fn prepare(&self, _db: &mut dyn Database) -> Result<()> {
        Ok(())
    }

    /// Release what `prepare` acquired. Never fails the dump.
    async fn teardown(&self, _db: &mut dyn Database) {}

    /// Table names in the order the server returns them.
    async fn list_tables(&self, db: &mut dyn Database) -> Result<Vec<String>>;

    async fn table_ddl(&self, db: &mut dyn Database, table: &str) -> Result<String>;

    /// Sequences emitted inside `table`'s block.
    async fn sequence_definitions(
        &self,
        _db: &mut dyn Database,
        _table: &str,
    ) -> Result<Vec<SequenceDefinition>> {
        Ok(Vec::new())
    }

    /// Sequences emitted once for the whole document.
    async fn document_sequences(&self, _db: &mut dyn Database) -> Result<Vec<SequenceDefinition>> {
        Ok(Vec::new())
    }

    /// Sequences, DDL and data for one table, in that order.
    async fn table_record(
        &self,
        db: &mut dyn Database,
        table: &str,
        page_size: usize,
    ) -> Result<TableRecord> {
        let sequences = self.sequence_definitions(db, table).await?;
        let ddl = self.table_ddl(db, table).await?;
        let values = stream_values(db, table, page_size, self.escaping()).await?;

        Ok(TableRecord {
            name: table.to_string(),
            ddl,
            sequences,
            values,
        })
    }

    fn render(&self, doc: &DumpDocument, out: &mut dyn Write) -> io::Result<()>;
}

/// Build the adapter for a detected server family.
pub fn for_kind(kind: DialectKind, attribution: SequenceAttribution) -> Box<dyn Dialect> {
    match kind {
        DialectKind::MySql => Box::new(MySqlDialect),
        DialectKind::Postgres => Box::new(PostgresDialect::new(attribution)),
    }
}
