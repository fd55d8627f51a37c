// ABOUTME: Database handle backed by a mysql_async connection
// ABOUTME: Materialises each result as text cells before returning

use super::converter::{column_names, mysql_row_to_text};
use crate::database::{Database, QueryResult};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use mysql_async::{prelude::*, Conn, Row};

pub struct MySqlHandle {
    conn: Option<Conn>,
}

impl MySqlHandle {
    pub fn new(conn: Conn) -> Self {
        Self { conn: Some(conn) }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(super::connect_mysql(url).await?))
    }

    fn conn(&mut self) -> Result<&mut Conn> {
        self.conn
            .as_mut()
            .ok_or_else(|| anyhow!("MySQL connection is closed"))
    }
}

#[async_trait]
impl Database for MySqlHandle {
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<QueryResult> {
        let conn = self.conn()?;

        // Text protocol without parameters, so every value arrives as text
        let fetched = if params.is_empty() {
            conn.query::<Row, _>(sql).await
        } else {
            let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
            conn.exec::<Row, _, _>(sql, params).await
        };
        let rows = fetched.with_context(|| format!("MySQL query failed: {}", sql))?;

        let columns = rows.first().map(column_names).unwrap_or_default();
        let rows = rows.iter().map(mysql_row_to_text).collect();

        Ok(QueryResult::new(columns, rows))
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn()?
            .query_drop(sql)
            .await
            .with_context(|| format!("MySQL statement failed: {}", sql))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect()
                .await
                .context("Failed to close MySQL connection")?;
            tracing::debug!("Closed MySQL connection");
        }
        Ok(())
    }
}
