// ABOUTME: PostgreSQL-family dump adapter
// ABOUTME: Installs a plpgsql helper to rebuild CREATE TABLE text and reconstructs sequences

use crate::database::Database;
use crate::dialect::{Dialect, DialectKind, SequenceAttribution};
use crate::dump::document::{DumpDocument, SequenceDefinition};
use crate::dump::template::render_postgres;
use crate::dump::values::Escaping;
use crate::error::{DumpError, Result};
use crate::utils::sanitize_identifier;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::io::{self, Write};

/// Server-side helper that synthesizes `CREATE TABLE` text from the catalog.
///
/// Columns are emitted in attribute order with type, default and nullability,
/// followed by every table constraint rendered by `pg_get_constraintdef`.
pub const INSTALL_SHOW_CREATE_TABLE: &str = r#"
CREATE OR REPLACE FUNCTION public.show_create_table(p_table_name character varying)
RETURNS SETOF text AS
$BODY$
DECLARE
    v_table_ddl  text;
    v_first      boolean;
    v_table      record;
    v_column     record;
    v_constraint record;
BEGIN
    FOR v_table IN
        SELECT c.oid AS table_oid, n.nspname, c.relname
        FROM pg_catalog.pg_class c
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind IN ('r', 'p')
          AND c.relname = p_table_name
          AND n.nspname <> 'pg_catalog'
          AND n.nspname <> 'information_schema'
          AND n.nspname !~ '^pg_toast'
          AND pg_catalog.pg_table_is_visible(c.oid)
        ORDER BY n.nspname, c.relname
    LOOP
        v_table_ddl := 'CREATE TABLE ' || v_table.nspname || '.' || v_table.relname || ' (';
        v_first := true;

        FOR v_column IN
            SELECT a.attname,
                   pg_catalog.format_type(a.atttypid, a.atttypmod) AS column_type,
                   COALESCE(' DEFAULT ' || pg_catalog.pg_get_expr(d.adbin, d.adrelid), '') AS column_default,
                   CASE WHEN a.attnotnull THEN ' NOT NULL' ELSE ' NULL' END AS column_null
            FROM pg_catalog.pg_attribute a
            LEFT JOIN pg_catalog.pg_attrdef d
                   ON d.adrelid = a.attrelid AND d.adnum = a.attnum AND a.atthasdef
            WHERE a.attrelid = v_table.table_oid
              AND a.attnum > 0
              AND NOT a.attisdropped
            ORDER BY a.attnum
        LOOP
            IF NOT v_first THEN
                v_table_ddl := v_table_ddl || ',';
            END IF;
            v_first := false;
            v_table_ddl := v_table_ddl || chr(10) || '    "' || v_column.attname || '" '
                || v_column.column_type || v_column.column_default || v_column.column_null;
        END LOOP;

        FOR v_constraint IN
            SELECT con.conname, pg_catalog.pg_get_constraintdef(con.oid) AS definition
            FROM pg_catalog.pg_constraint con
            WHERE con.conrelid = v_table.table_oid
              AND con.contype <> 'n'
            ORDER BY con.conname
        LOOP
            v_table_ddl := v_table_ddl || ',' || chr(10) || 'CONSTRAINT ' || v_constraint.conname
                || chr(10) || '    ' || v_constraint.definition;
        END LOOP;

        v_table_ddl := v_table_ddl || chr(10) || ');';
        RETURN NEXT v_table_ddl;
    END LOOP;
END;
$BODY$
LANGUAGE plpgsql VOLATILE
COST 100;
"#;

pub const DROP_SHOW_CREATE_TABLE: &str =
    "DROP FUNCTION IF EXISTS public.show_create_table(character varying)";

const SHOW_CREATE_TABLE: &str = "SELECT public.show_create_table($1)";

const LIST_TABLES: &str = "SELECT tablename FROM pg_catalog.pg_tables \
     WHERE schemaname NOT IN ('pg_catalog', 'information_schema') \
     ORDER BY schemaname, tablename";

const LIST_SEQUENCES: &str =
    "SELECT c.relname FROM pg_catalog.pg_class c WHERE c.relkind = 'S' ORDER BY c.relname";

// Auto ('a') dependencies come from serial/OWNED BY, internal ('i') from identity columns
const LIST_OWNED_SEQUENCES: &str = "SELECT s.relname::text \
     FROM pg_catalog.pg_class s \
     JOIN pg_catalog.pg_depend d \
       ON d.classid = 'pg_catalog.pg_class'::regclass \
      AND d.objid = s.oid \
      AND d.refclassid = 'pg_catalog.pg_class'::regclass \
      AND d.deptype IN ('a', 'i') \
     JOIN pg_catalog.pg_class t ON t.oid = d.refobjid \
     WHERE s.relkind = 'S' AND t.relname = $1 \
     ORDER BY s.relname";

const LIST_UNOWNED_SEQUENCES: &str = "SELECT s.relname \
     FROM pg_catalog.pg_class s \
     WHERE s.relkind = 'S' \
       AND NOT EXISTS ( \
           SELECT 1 FROM pg_catalog.pg_depend d \
           WHERE d.classid = 'pg_catalog.pg_class'::regclass \
             AND d.objid = s.oid \
             AND d.refclassid = 'pg_catalog.pg_class'::regclass \
             AND d.deptype IN ('a', 'i')) \
     ORDER BY s.relname";

const LOOKUP_SEQUENCE: &str = "SELECT sequence_schema::text, start_value::text, \
     minimum_value::text, maximum_value::text, increment::text \
     FROM information_schema.sequences \
     WHERE sequence_name::text = $1";

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect {
    attribution: SequenceAttribution,
}

fn first_column(rows: Vec<Vec<Option<String>>>) -> Vec<String> {
    rows.into_iter()
        .map(|row| row.into_iter().next().flatten().unwrap_or_default())
        .collect()
}

impl PostgresDialect {
    pub fn new(attribution: SequenceAttribution) -> Self {
        Self { attribution }
    }

    pub fn attribution(&self) -> SequenceAttribution {
        self.attribution
    }

    async fn sequence_names(
        &self,
        db: &mut dyn Database,
        sql: &str,
        params: &[&str],
    ) -> Result<Vec<String>> {
        let result = db
            .query(sql, params)
            .await
            .map_err(|e| DumpError::SequenceLookupFailed {
                name: "*".to_string(),
                source: e,
            })?;
        Ok(first_column(result.rows))
    }

    async fn sequence(&self, db: &mut dyn Database, name: &str) -> Result<SequenceDefinition> {
        let lookup_failed = |source: anyhow::Error| DumpError::SequenceLookupFailed {
            name: name.to_string(),
            source,
        };

        let row = db
            .query_row(LOOKUP_SEQUENCE, &[name])
            .await
            .map_err(lookup_failed)?
            .ok_or_else(|| lookup_failed(anyhow!("sequence not found in information_schema")))?;

        let cell = |idx: usize, field: &str| -> Result<i64> {
            row.get(idx)
                .cloned()
                .flatten()
                .ok_or_else(|| anyhow!("{} is NULL", field))
                .and_then(|v| {
                    v.parse::<i64>()
                        .with_context(|| format!("{} '{}' is not an integer", field, v))
                })
                .map_err(lookup_failed)
        };

        Ok(SequenceDefinition {
            schema: row.first().cloned().flatten().unwrap_or_default(),
            name: name.to_string(),
            start: cell(1, "start_value")?,
            min: cell(2, "minimum_value")?,
            max: cell(3, "maximum_value")?,
            increment: cell(4, "increment")?,
        })
    }

    async fn sequences(
        &self,
        db: &mut dyn Database,
        names: Vec<String>,
    ) -> Result<Vec<SequenceDefinition>> {
        let mut definitions = Vec::with_capacity(names.len());
        for name in names {
            definitions.push(self.sequence(db, &name).await?);
        }
        Ok(definitions)
    }
}

#[async_trait]
impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn escaping(&self) -> Escaping {
        Escaping::Standard
    }

    async fn prepare(&self, db: &mut dyn Database) -> Result<()> {
        tracing::debug!("Installing public.show_create_table()");
        db.execute(INSTALL_SHOW_CREATE_TABLE)
            .await
            .map_err(DumpError::ProcedureInstallFailed)
    }

    async fn teardown(&self, db: &mut dyn Database) {
        match db.execute(DROP_SHOW_CREATE_TABLE).await {
            Ok(()) => tracing::debug!("Dropped public.show_create_table()"),
            Err(e) => tracing::warn!("{}", DumpError::ProcedureDropFailed(e)),
        }
    }

    async fn list_tables(&self, db: &mut dyn Database) -> Result<Vec<String>> {
        let result = db
            .query(LIST_TABLES, &[])
            .await
            .map_err(DumpError::TableEnumerationFailed)?;

        let tables = first_column(result.rows);
        tracing::info!("Found {} table(s)", tables.len());

        Ok(tables)
    }

    /// Run the installed helper; multiple result rows are joined with newlines.
    async fn table_ddl(&self, db: &mut dyn Database, table: &str) -> Result<String> {
        let result = db
            .query(SHOW_CREATE_TABLE, &[table])
            .await
            .map_err(|e| DumpError::ddl(table, e))?;

        if result.is_empty() {
            return Err(DumpError::ddl(
                table,
                anyhow!("no table definition returned for '{}'", sanitize_identifier(table)),
            ));
        }

        Ok(first_column(result.rows).join("\n"))
    }

    async fn sequence_definitions(
        &self,
        db: &mut dyn Database,
        table: &str,
    ) -> Result<Vec<SequenceDefinition>> {
        let names = match self.attribution {
            SequenceAttribution::Owned => {
                self.sequence_names(db, LIST_OWNED_SEQUENCES, &[table]).await?
            }
            SequenceAttribution::EveryTable => self.sequence_names(db, LIST_SEQUENCES, &[]).await?,
        };
        self.sequences(db, names).await
    }

    async fn document_sequences(&self, db: &mut dyn Database) -> Result<Vec<SequenceDefinition>> {
        match self.attribution {
            SequenceAttribution::Owned => {
                let names = self.sequence_names(db, LIST_UNOWNED_SEQUENCES, &[]).await?;
                self.sequences(db, names).await
            }
            SequenceAttribution::EveryTable => Ok(Vec::new()),
        }
    }

    fn render(&self, doc: &DumpDocument, out: &mut dyn Write) -> io::Result<()> {
        render_postgres(doc, out)
    }
}
