// ABOUTME: MySQL-family dump adapter
// ABOUTME: Uses SHOW TABLES and SHOW CREATE TABLE for catalog access

use crate::database::Database;
use crate::dialect::{Dialect, DialectKind};
use crate::dump::document::DumpDocument;
use crate::dump::template::render_mysql;
use crate::dump::values::Escaping;
use crate::error::{DumpError, Result};
use anyhow::anyhow;
use async_trait::async_trait;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

#[async_trait]
impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn escaping(&self) -> Escaping {
        Escaping::Backslash
    }

    /// List tables with `SHOW TABLES`
    ///
    /// Server order is kept as-is. A NULL name is returned as an empty string.
    async fn list_tables(&self, db: &mut dyn Database) -> Result<Vec<String>> {
        let result = db
            .query("SHOW TABLES", &[])
            .await
            .map_err(DumpError::TableEnumerationFailed)?;

        let tables: Vec<String> = result
            .rows
            .into_iter()
            .map(|row| row.into_iter().next().flatten().unwrap_or_default())
            .collect();

        tracing::info!("Found {} table(s)", tables.len());

        Ok(tables)
    }

    /// Fetch the server's own `CREATE TABLE` text
    ///
    /// # Errors
    ///
    /// `ColumnMismatch` if the echoed table name differs from `table`.
    async fn table_ddl(&self, db: &mut dyn Database, table: &str) -> Result<String> {
        let sql = format!("SHOW CREATE TABLE {}", table);
        let row = db
            .query_row(&sql, &[])
            .await
            .map_err(|e| DumpError::ddl(table, e))?
            .ok_or_else(|| DumpError::ddl(table, anyhow!("SHOW CREATE TABLE returned no rows")))?;

        let mut cells = row.into_iter();
        let returned = cells.next().flatten().unwrap_or_default();
        let ddl = cells.next().flatten().unwrap_or_default();

        if returned != table {
            return Err(DumpError::ColumnMismatch {
                requested: table.to_string(),
                returned,
            });
        }

        Ok(ddl)
    }

    fn render(&self, doc: &DumpDocument, out: &mut dyn Write) -> io::Result<()> {
        render_mysql(doc, out)
    }
}
