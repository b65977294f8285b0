//! Conversion from rusqlite rows to the backend-agnostic value types.

use rusqlite::types::ValueRef;
use rusqlite::Statement;

use crate::traits::{ColumnInfo, Row, Value};

/// Converter from rusqlite result rows to the unified `Value` type.
pub(crate) struct CipherValueConverter;

impl CipherValueConverter {
    /// Build column metadata from a prepared statement.
    pub(crate) fn column_info(statement: &Statement<'_>) -> Vec<ColumnInfo> {
        statement
            .columns()
            .iter()
            .enumerate()
            .map(|(ordinal, column)| {
                let info = ColumnInfo::new(column.name().to_string(), ordinal);
                match column.decl_type() {
                    Some(decl) => info.with_decl_type(decl.to_string()),
                    None => info,
                }
            })
            .collect()
    }

    /// Convert one result row. `column_count` comes from the statement; rows
    /// do not know their own width.
    pub(crate) fn convert_row(
        row: &rusqlite::Row<'_>,
        column_count: usize,
    ) -> rusqlite::Result<Row> {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(Self::convert_value(row.get_ref(index)?));
        }
        Ok(Row::new(values))
    }

    fn convert_value(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}
