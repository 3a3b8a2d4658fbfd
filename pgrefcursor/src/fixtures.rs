/* *********************************************************************
* Copyright (c) 2024 Mimer Information Technology
*
* Permission is hereby granted, free of charge, to any person obtaining a copy
* of this software and associated documentation files (the "Software"), to deal
* in the Software without restriction, including without limitation the rights
* to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
* copies of the Software, and to permit persons to whom the Software is
* furnished to do so, subject to the following conditions:
*
* The above copyright notice and this permission notice shall be included in all
* copies or substantial portions of the Software.
*
* THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
* IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
* FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
* AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
* LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
* OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
* SOFTWARE.
*
* See license for more details.
* *********************************************************************/

//! Fixture tables the ref cursors are opened over.
//!
//! Both tables are created if absent, emptied and filled with the same literal rows on every
//! call to [setup_tables], so running it any number of times leaves the same contents.

use crate::{common::sql::quote_identifier, Connection, RefcursorError, Test2Row, TestRow};
use tracing::info;

pub const TEST_TABLE: &str = "test";
pub const TEST_TABLE_COLUMNS: &str = "(id integer, s text)";
pub const TEST_TABLE_EXAMPLE_VALUES: &str = "VALUES (1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')";

pub const TEST2_TABLE: &str = "test2";
pub const TEST2_TABLE_COLUMNS: &str = "(a text, b text, c text)";
pub const TEST2_TABLE_EXAMPLE_VALUES: &str =
    "VALUES ('a', 'b', 'c'), ('d', 'e', 'f'), ('g', 'h', 'i')";

/// Returns the statements that reset `table`, in execution order.
fn reset_statements(table: &str, columns: &str, values: &str) -> [String; 3] {
    [
        format!("CREATE TABLE IF NOT EXISTS {table} {columns}"),
        format!("DELETE FROM {table}"),
        format!("INSERT INTO {table} {values}"),
    ]
}

/// Returns every setup statement, `test` first.
pub fn setup_statements() -> Vec<String> {
    let mut statements = Vec::with_capacity(6);
    statements.extend(reset_statements(
        TEST_TABLE,
        TEST_TABLE_COLUMNS,
        TEST_TABLE_EXAMPLE_VALUES,
    ));
    statements.extend(reset_statements(
        TEST2_TABLE,
        TEST2_TABLE_COLUMNS,
        TEST2_TABLE_EXAMPLE_VALUES,
    ));
    statements
}

/// Creates the fixture tables if needed and resets their contents.
///
/// # Errors
/// Returns [RefcursorError::Execute] for the first statement that fails. Statements that ran
/// before it are not undone.
///
/// # Examples
/// ```no_run
/// # use pgrefcursor::*;
/// let mut conn = Connection::open(&Config::from_env()).unwrap();
/// fixtures::setup_tables(&mut conn).unwrap();
/// assert_eq!(fixtures::count_rows(&mut conn, fixtures::TEST_TABLE).unwrap(), 4);
/// ```
pub fn setup_tables(conn: &mut Connection) -> Result<(), RefcursorError> {
    for statement in setup_statements() {
        conn.execute_statement(&statement)?;
    }
    info!(tables = ?[TEST_TABLE, TEST2_TABLE], "fixture tables reset");
    Ok(())
}

/// Counts the rows currently in `table`.
pub fn count_rows(conn: &mut Connection, table: &str) -> Result<i64, RefcursorError> {
    let query = format!("SELECT count(*) FROM {}", quote_identifier(table));
    conn.client
        .query_one(query.as_str(), &[])
        .and_then(|row| row.try_get(0))
        .map_err(|source| RefcursorError::Query {
            context: query,
            source,
        })
}

/// The rows of `test`, in insertion order.
pub fn expected_test_rows() -> Vec<TestRow> {
    vec![
        TestRow::new(1, "a"),
        TestRow::new(2, "b"),
        TestRow::new(3, "c"),
        TestRow::new(4, "d"),
    ]
}

/// The rows of `test2`, in insertion order.
pub fn expected_test2_rows() -> Vec<Test2Row> {
    vec![
        Test2Row::new("a", "b", "c"),
        Test2Row::new("d", "e", "f"),
        Test2Row::new("g", "h", "i"),
    ]
}
