// ABOUTME: Paginated row export for a single table
// ABOUTME: Fetches LIMIT/OFFSET pages and joins their tuple literals into one VALUES list

use crate::database::Database;
use crate::dump::values::{row_literal, Escaping};
use crate::error::{DumpError, Result};
use crate::utils::sanitize_identifier;

/// Rows fetched per page unless the dumper is told otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

fn page_query(table: &str, limit: usize, offset: usize) -> String {
    format!("SELECT * FROM {} LIMIT {} OFFSET {}", table, limit, offset)
}

/// Export every row of `table` as `(...),(...)`
///
/// Each page is fully materialised before the next one is requested. Paging
/// stops at the first page holding fewer than `page_size` rows. A table without
/// rows yields an empty string.
///
/// # Errors
///
/// - `InvalidPageSize` if `page_size` is zero
/// - `RowScanFailed` if any page query fails; nothing already read is returned
/// - `NoColumnsInTable` if a row comes back without cells
pub async fn stream_values(
    db: &mut dyn Database,
    table: &str,
    page_size: usize,
    escaping: Escaping,
) -> Result<String> {
    if page_size == 0 {
        return Err(DumpError::InvalidPageSize);
    }

    let mut literals: Vec<String> = Vec::new();
    let mut offset = 0;

    loop {
        let sql = page_query(table, page_size, offset);
        let page = db
            .query(&sql, &[])
            .await
            .map_err(|e| DumpError::row_scan(table, e))?;

        tracing::debug!(
            "Fetched {} row(s) from '{}' at offset {}",
            page.rows.len(),
            sanitize_identifier(table),
            offset
        );

        for row in &page.rows {
            if row.is_empty() {
                return Err(DumpError::NoColumnsInTable(table.to_string()));
            }
            literals.push(row_literal(row, escaping));
        }

        if page.rows.len() < page_size {
            break;
        }
        offset += page.rows.len();
    }

    Ok(literals.join(","))
}
