// ABOUTME: Serializes fetched rows into SQL VALUES tuple literals
// ABOUTME: NULL becomes a bare null token, every other cell a quoted string literal

use crate::database::Cell;

/// How embedded characters are escaped inside a quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escaping {
    /// MySQL-family: backslash is an escape character, so it is doubled along with `'`.
    Backslash,
    /// Standard SQL (PostgreSQL with standard_conforming_strings): only `'` is doubled.
    Standard,
}

/// Quote a single non-null value.
pub fn quote_literal(value: &str, escaping: Escaping) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => quoted.push_str("''"),
            '\\' if escaping == Escaping::Backslash => quoted.push_str("\\\\"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Render one row as `('a',null,'')`.
///
/// The caller guarantees the row has at least one cell.
///
/// # Examples
///
/// ```
/// # use sql_dumper::dump::values::{row_literal, Escaping};
/// let row = vec![Some("1".to_string()), None, Some(String::new())];
/// assert_eq!(row_literal(&row, Escaping::Standard), "('1',null,'')");
/// ```
pub fn row_literal(row: &[Cell], escaping: Escaping) -> String {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| match cell {
            Some(value) => quote_literal(value, escaping),
            None => "null".to_string(),
        })
        .collect();

    format!("({})", cells.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Option<&str>]) -> Vec<Cell> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn test_null_is_bare_token() {
        let literal = row_literal(&row(&[Some("1"), None, Some("Test Name 1")]), Escaping::Backslash);
        assert_eq!(literal, "('1',null,'Test Name 1')");
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let literal = row_literal(&row(&[Some("3"), Some(""), Some("Test Name 3")]), Escaping::Standard);
        assert_eq!(literal, "('3','','Test Name 3')");
    }

    #[test]
    fn test_single_column_row() {
        assert_eq!(row_literal(&row(&[None]), Escaping::Standard), "(null)");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        assert_eq!(quote_literal("O'Brien", Escaping::Standard), "'O''Brien'");
        assert_eq!(quote_literal("O'Brien", Escaping::Backslash), "'O''Brien'");
    }

    #[test]
    fn test_backslash_depends_on_dialect() {
        assert_eq!(quote_literal(r"C:\tmp", Escaping::Backslash), r"'C:\\tmp'");
        assert_eq!(quote_literal(r"C:\tmp", Escaping::Standard), r"'C:\tmp'");
    }

    #[test]
    fn test_null_text_is_quoted() {
        // The string "null" must stay distinguishable from SQL NULL
        assert_eq!(row_literal(&row(&[Some("null")]), Escaping::Standard), "('null')");
    }
}
