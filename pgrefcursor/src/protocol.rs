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

use crate::{
    fixtures, routines, Config, Connection, CursorHandle, FromCursorRow, RefcursorError,
    Test2Row, TestRow, Transaction, TransactionMode, RC_2,
};
use tracing::info;

#[doc(hidden)]
use std::fmt::Display;

/// What one run of [consume_ref_cursors] saw: the two handles and every decoded row, in the
/// order they were fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorReport {
    pub handles: (CursorHandle, CursorHandle),
    pub test_rows: Vec<TestRow>,
    pub test2_rows: Vec<Test2Row>,
}

/// Calls [RC_2] inside one transaction and reads both of its cursors.
///
/// The steps run in a fixed order: begin, call the routine, drain cursor `a` completely, drain
/// cursor `b` completely, commit. A stream has to be drained before the next fetch is issued,
/// and both fetches have to happen before the commit closes the cursors.
///
/// # Errors
/// Any failure ends the transaction with a rollback and is returned as is. Nothing is retried.
///
/// # Examples
/// ```no_run
/// # use pgrefcursor::*;
/// let mut conn = Connection::open(&Config::from_env()).unwrap();
/// fixtures::setup_tables(&mut conn).unwrap();
/// routines::install_routines(&mut conn).unwrap();
///
/// let report = consume_ref_cursors(&mut conn).unwrap();
/// assert_eq!(report.test_rows, fixtures::expected_test_rows());
/// ```
pub fn consume_ref_cursors(conn: &mut Connection) -> Result<CursorReport, RefcursorError> {
    // ref cursors are scoped to the transaction
    let mut trans = conn.begin_transaction(TransactionMode::ReadWrite)?;
    let (a, b) = trans.open_cursors(&RC_2)?;

    let test_rows = drain::<TestRow>(&mut trans, &a)?;
    let test2_rows = drain::<Test2Row>(&mut trans, &b)?;

    trans.commit()?;
    Ok(CursorReport {
        handles: (a, b),
        test_rows,
        test2_rows,
    })
}

/// Fetches every row of `handle` and reads the stream to the end, logging each row.
fn drain<T>(trans: &mut Transaction<'_>, handle: &CursorHandle) -> Result<Vec<T>, RefcursorError>
where
    T: FromCursorRow + Display,
{
    let mut rows = trans.fetch_all(handle)?;
    let mut decoded = Vec::new();
    while let Some(row) = rows.next_decoded::<T>()? {
        info!("Row: {row}");
        decoded.push(row);
    }
    Ok(decoded)
}

/// Runs the whole demonstration on a new connection: reset the fixture tables, install the
/// routines and consume the two ref cursors.
///
/// # Examples
/// ```no_run
/// let report = pgrefcursor::run(&pgrefcursor::Config::from_env()).unwrap();
/// assert_eq!(report.test2_rows.len(), 3);
/// ```
pub fn run(config: &Config) -> Result<CursorReport, RefcursorError> {
    let mut conn = Connection::open(config)?;
    fixtures::setup_tables(&mut conn)?;
    routines::install_routines(&mut conn)?;
    consume_ref_cursors(&mut conn)
}
