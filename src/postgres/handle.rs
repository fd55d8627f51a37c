// ABOUTME: Database handle backed by a tokio-postgres client
// ABOUTME: Parameterless queries use the simple-query protocol so every value arrives as text

use crate::database::{Database, QueryResult, Row};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, SimpleQueryMessage};

pub struct PostgresHandle {
    client: Option<Client>,
}

impl PostgresHandle {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(super::connect(url).await?))
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| anyhow!("PostgreSQL connection is closed"))
    }

    async fn simple_query(&self, sql: &str) -> Result<QueryResult> {
        let messages = self
            .client()?
            .simple_query(sql)
            .await
            .with_context(|| format!("PostgreSQL query failed: {}", sql))?;

        let mut result = QueryResult::default();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                if result.columns.is_empty() {
                    result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                let cells: Row = (0..row.len())
                    .map(|idx| row.get(idx).map(str::to_string))
                    .collect();
                result.rows.push(cells);
            }
        }

        Ok(result)
    }

    /// Extended protocol with bound text parameters. Every selected column
    /// must be of a text type (cast with `::text` in the statement).
    async fn bound_query(&self, sql: &str, params: &[&str]) -> Result<QueryResult> {
        let bound: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let rows = self
            .client()?
            .query(sql, &bound)
            .await
            .with_context(|| format!("PostgreSQL query failed: {}", sql))?;

        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let mut cells = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values: Row = Vec::with_capacity(row.len());
            for idx in 0..row.len() {
                let value: Option<String> = row
                    .try_get(idx)
                    .with_context(|| format!("Column {} is not text in: {}", idx, sql))?;
                values.push(value);
            }
            cells.push(values);
        }

        Ok(QueryResult::new(columns, cells))
    }
}

#[async_trait]
impl Database for PostgresHandle {
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<QueryResult> {
        if params.is_empty() {
            self.simple_query(sql).await
        } else {
            self.bound_query(sql, params).await
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.client()?
            .batch_execute(sql)
            .await
            .with_context(|| format!("PostgreSQL statement failed: {}", sql))
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the client ends the spawned connection task
        if self.client.take().is_some() {
            tracing::debug!("Closed PostgreSQL connection");
        }
        Ok(())
    }
}
