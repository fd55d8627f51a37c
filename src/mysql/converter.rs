// ABOUTME: MySQL value to text conversion for dump cells
// ABOUTME: Renders binary-protocol values the way the server renders them as text

use crate::database::{Cell, Row as TextRow};
use mysql_async::{Row, Value};

/// Convert a MySQL Value to a nullable text cell
///
/// Text-protocol results arrive as `Bytes` and pass through unchanged; the
/// typed variants of the binary protocol are formatted like MySQL's own
/// text output (`YYYY-MM-DD HH:MM:SS[.ffffff]`, `[-]HHH:MM:SS[.ffffff]`).
///
/// # Examples
///
/// ```
/// # use mysql_async::Value;
/// # use sql_dumper::mysql::converter::mysql_value_to_text;
/// assert_eq!(mysql_value_to_text(&Value::NULL), None);
/// assert_eq!(mysql_value_to_text(&Value::Int(42)), Some("42".to_string()));
/// ```
pub fn mysql_value_to_text(value: &Value) -> Cell {
    match value {
        Value::NULL => None,

        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),

        // Non-UTF-8 payloads are replaced lossily
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),

        Value::Date(year, month, day, hour, minute, second, micro) => {
            let mut text = format!("{:04}-{:02}-{:02}", year, month, day);
            if (*hour, *minute, *second, *micro) != (0, 0, 0, 0) {
                text.push_str(&format!(" {:02}:{:02}:{:02}", hour, minute, second));
            }
            if *micro > 0 {
                text.push_str(&format!(".{:06}", micro));
            }
            Some(text)
        }

        Value::Time(is_negative, days, hours, minutes, seconds, microseconds) => {
            let sign = if *is_negative { "-" } else { "" };
            let total_hours = u64::from(*days) * 24 + u64::from(*hours);
            let mut text = format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds);
            if *microseconds > 0 {
                text.push_str(&format!(".{:06}", microseconds));
            }
            Some(text)
        }
    }
}

/// Convert every column of a MySQL row to text cells, in column order.
pub fn mysql_row_to_text(row: &Row) -> TextRow {
    (0..row.len())
        .map(|idx| row.as_ref(idx).and_then(mysql_value_to_text))
        .collect()
}

/// Column names of a MySQL row.
pub fn column_names(row: &Row) -> Vec<String> {
    row.columns_ref()
        .iter()
        .map(|column| column.name_str().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_null() {
        assert_eq!(mysql_value_to_text(&Value::NULL), None);
    }

    #[test]
    fn test_convert_integers() {
        assert_eq!(mysql_value_to_text(&Value::Int(-7)), Some("-7".to_string()));
        assert_eq!(mysql_value_to_text(&Value::UInt(42)), Some("42".to_string()));
    }

    #[test]
    fn test_convert_double() {
        assert_eq!(mysql_value_to_text(&Value::Double(123.456)), Some("123.456".to_string()));
    }

    #[test]
    fn test_convert_string_bytes() {
        let value = Value::Bytes(b"Hello World".to_vec());
        assert_eq!(mysql_value_to_text(&value), Some("Hello World".to_string()));
    }

    #[test]
    fn test_convert_empty_bytes_is_not_null() {
        assert_eq!(mysql_value_to_text(&Value::Bytes(vec![])), Some(String::new()));
    }

    #[test]
    fn test_convert_datetime() {
        let value = Value::Date(2024, 1, 15, 10, 30, 45, 123456);
        assert_eq!(
            mysql_value_to_text(&value),
            Some("2024-01-15 10:30:45.123456".to_string())
        );
    }

    #[test]
    fn test_convert_date_only() {
        let value = Value::Date(2024, 1, 15, 0, 0, 0, 0);
        assert_eq!(mysql_value_to_text(&value), Some("2024-01-15".to_string()));
    }

    #[test]
    fn test_convert_time() {
        let value = Value::Time(false, 1, 10, 30, 45, 0);
        assert_eq!(mysql_value_to_text(&value), Some("34:30:45".to_string()));

        let negative = Value::Time(true, 0, 2, 5, 0, 500);
        assert_eq!(mysql_value_to_text(&negative), Some("-02:05:00.000500".to_string()));
    }
}
