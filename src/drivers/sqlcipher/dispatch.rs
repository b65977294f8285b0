//! Statement classification and typed execution paths.
//!
//! A statement is routed by its leading keyword into one of four paths, each
//! producing a distinct result shape. The connection is owned by `execute`
//! and dropped on every exit path; statements and cursors are scoped to the
//! path that acquired them, so release is guaranteed even when the handler
//! or the engine fails.

use anyhow::Result;
use rusqlite::{Connection, Rows};

use super::types::CipherValueConverter;
use crate::error::DriverError;
use crate::traits::{ColumnInfo, QueryResult, Row, TableResult};

/// Live cursor over a row-producing statement, handed to the result handler.
///
/// Valid only for the duration of one `handle_select` call; the backing
/// statement is released as soon as the handler returns.
pub struct SelectCursor<'stmt> {
    columns: Vec<ColumnInfo>,
    rows: Rows<'stmt>,
}

impl SelectCursor<'_> {
    /// Column metadata of the result set.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Advance the cursor, converting the next row if there is one.
    pub fn next_row(&mut self) -> rusqlite::Result<Option<Row>> {
        match self.rows.next()? {
            Some(raw) => CipherValueConverter::convert_row(raw, self.columns.len()).map(Some),
            None => Ok(None),
        }
    }
}

/// Capability set invoked with the outcome of one dispatched statement.
/// Exactly one method is called per `execute`, chosen by the routing table.
pub trait ResultHandler {
    type Output;

    /// UPDATE/DELETE executed; `rows_affected` rows changed.
    fn handle_update_delete(&mut self, rows_affected: usize) -> Result<Self::Output>;

    /// INSERT executed; the store assigned `row_id`.
    fn handle_insert(&mut self, row_id: i64) -> Result<Self::Output>;

    /// Row-producing statement executed; consume the live cursor.
    fn handle_select(&mut self, cursor: &mut SelectCursor<'_>) -> Result<Self::Output>;

    /// Fire-and-forget statement executed; nothing to report.
    fn handle_raw(&mut self) -> Result<Self::Output>;
}

/// Default handler: collects the outcome into the [`QueryResult`] union.
#[derive(Debug, Default)]
pub struct CollectingHandler;

impl ResultHandler for CollectingHandler {
    type Output = QueryResult;

    fn handle_update_delete(&mut self, rows_affected: usize) -> Result<QueryResult> {
        Ok(QueryResult::RowsAffected {
            count: rows_affected,
        })
    }

    fn handle_insert(&mut self, row_id: i64) -> Result<QueryResult> {
        Ok(QueryResult::Inserted { row_id })
    }

    fn handle_select(&mut self, cursor: &mut SelectCursor<'_>) -> Result<QueryResult> {
        let columns = cursor.columns().to_vec();
        let mut rows = Vec::new();
        while let Some(row) = cursor.next_row()? {
            rows.push(row);
        }
        Ok(QueryResult::Table(TableResult { columns, rows }))
    }

    fn handle_raw(&mut self) -> Result<QueryResult> {
        Ok(QueryResult::Statement)
    }
}

/// Execute one statement, routing by leading keyword.
///
/// Takes the connection by value: it is closed when this function returns,
/// success or failure.
pub fn execute<H: ResultHandler>(
    conn: Connection,
    sql: &str,
    handler: &mut H,
) -> Result<H::Output, DriverError> {
    match leading_keyword(sql).as_str() {
        "UPDATE" | "DELETE" => execute_update_delete(&conn, sql, handler),
        "INSERT" => execute_insert(&conn, sql, handler),
        "SELECT" | "PRAGMA" | "EXPLAIN" => execute_select(&conn, sql, handler),
        _ => execute_raw(&conn, sql, handler),
    }
    // `conn` dropped here on every path.
}

/// The statement's first word: trimmed, cut at the first space, uppercased.
fn leading_keyword(sql: &str) -> String {
    let trimmed = sql.trim();
    let keyword = match trimmed.find(' ') {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };
    keyword.to_uppercase()
}

fn execute_update_delete<H: ResultHandler>(
    conn: &Connection,
    sql: &str,
    handler: &mut H,
) -> Result<H::Output, DriverError> {
    let rows_affected = conn.execute(sql, [])?;
    handler.handle_update_delete(rows_affected).map_err(handler_error)
}

fn execute_insert<H: ResultHandler>(
    conn: &Connection,
    sql: &str,
    handler: &mut H,
) -> Result<H::Output, DriverError> {
    conn.execute(sql, [])?;
    handler.handle_insert(conn.last_insert_rowid()).map_err(handler_error)
}

fn execute_select<H: ResultHandler>(
    conn: &Connection,
    sql: &str,
    handler: &mut H,
) -> Result<H::Output, DriverError> {
    let mut statement = conn.prepare(sql)?;
    let columns = CipherValueConverter::column_info(&statement);
    let rows = statement.query([])?;
    let mut cursor = SelectCursor { columns, rows };
    handler.handle_select(&mut cursor).map_err(handler_error)
    // Cursor and statement dropped here whether the handler succeeded or not.
}

fn execute_raw<H: ResultHandler>(
    conn: &Connection,
    sql: &str,
    handler: &mut H,
) -> Result<H::Output, DriverError> {
    conn.execute_batch(sql)?;
    handler.handle_raw().map_err(handler_error)
}

/// Engine errors surfacing through a handler stay execution errors; anything
/// else the handler raised is its own failure.
fn handler_error(err: anyhow::Error) -> DriverError {
    match err.downcast::<rusqlite::Error>() {
        Ok(execution) => DriverError::Execution(execution),
        Err(other) => DriverError::Handler(other.into()),
    }
}
