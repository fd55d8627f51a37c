// ABOUTME: Scripted in-memory Database used by unit tests
// ABOUTME: Replays queued expectations in order and records every statement issued

use super::{Database, QueryResult, Row};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Outcome {
    Rows(QueryResult),
    Executed,
    Fail(String),
}

#[derive(Debug)]
struct Expectation {
    sql_prefix: String,
    params: Option<Vec<String>>,
    outcome: Outcome,
}

#[derive(Debug, Default)]
struct State {
    expectations: VecDeque<Expectation>,
    issued: Vec<String>,
    closed: bool,
}

/// Clones share state, so a test keeps one clone to inspect after handing the
/// other to a `Dumper`.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockDatabase {
    state: Arc<Mutex<State>>,
}

pub(crate) fn text_row(cells: &[Option<&str>]) -> Row {
    cells.iter().map(|c| c.map(str::to_string)).collect()
}

impl MockDatabase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, sql_prefix: &str, params: Option<Vec<String>>, outcome: Outcome) -> &Self {
        self.state
            .lock()
            .unwrap()
            .expectations
            .push_back(Expectation {
                sql_prefix: sql_prefix.to_string(),
                params,
                outcome,
            });
        self
    }

    /// Expect a query whose SQL starts with `sql_prefix` and answer with `rows`.
    pub(crate) fn expect_query(
        &self,
        sql_prefix: &str,
        columns: &[&str],
        rows: Vec<Row>,
    ) -> &Self {
        let result = QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows);
        self.push(sql_prefix, None, Outcome::Rows(result))
    }

    /// Like `expect_query` but also checks the bound parameters.
    pub(crate) fn expect_query_with(
        &self,
        sql_prefix: &str,
        params: &[&str],
        columns: &[&str],
        rows: Vec<Row>,
    ) -> &Self {
        let result = QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows);
        let params = params.iter().map(|p| p.to_string()).collect();
        self.push(sql_prefix, Some(params), Outcome::Rows(result))
    }

    pub(crate) fn expect_execute(&self, sql_prefix: &str) -> &Self {
        self.push(sql_prefix, None, Outcome::Executed)
    }

    /// Fail the next statement starting with `sql_prefix`.
    pub(crate) fn expect_failure(&self, sql_prefix: &str, message: &str) -> &Self {
        self.push(sql_prefix, None, Outcome::Fail(message.to_string()))
    }

    pub(crate) fn issued(&self) -> Vec<String> {
        self.state.lock().unwrap().issued.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub(crate) fn assert_expectations_met(&self) {
        let state = self.state.lock().unwrap();
        assert!(
            state.expectations.is_empty(),
            "unfulfilled expectations: {:?}",
            state.expectations
        );
    }

    fn next(&self, sql: &str, params: &[&str]) -> Result<Outcome> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            bail!("database is closed");
        }
        state.issued.push(sql.trim().to_string());

        let expectation = state
            .expectations
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected statement: {}", sql.trim()))?;

        if !sql.trim().starts_with(&expectation.sql_prefix) {
            bail!(
                "statement '{}' does not match expected '{}'",
                sql.trim(),
                expectation.sql_prefix
            );
        }
        if let Some(expected) = &expectation.params {
            if expected.as_slice() != params {
                bail!("parameters {:?} do not match expected {:?}", params, expected);
            }
        }

        Ok(expectation.outcome)
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<QueryResult> {
        match self.next(sql, params)? {
            Outcome::Rows(result) => Ok(result),
            Outcome::Executed => Ok(QueryResult::default()),
            Outcome::Fail(message) => Err(anyhow!(message)),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        match self.next(sql, &[])? {
            Outcome::Fail(message) => Err(anyhow!(message)),
            _ => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}
