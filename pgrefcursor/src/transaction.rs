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
    common::options::{EndTransactionMode, TransactionMode},
    connection::Connection,
    routines::Routine,
    CursorHandle, CursorRows, RefcursorError,
};
use postgres::types::ToSql;
use tracing::{debug, info};

/// Represents a transaction on a database connection. A Transaction will roll back by default if the object is dropped.
/// Use the `commit` method to commit the changes made in the transaction.
///
/// Ref cursors opened inside the transaction are closed by the server when it ends, so every
/// fetch has to happen before [commit](Transaction::commit) or [rollback](Transaction::rollback).
pub struct Transaction<'a> {
    inner: postgres::Transaction<'a>,
    mode: TransactionMode,
}

impl<'a> Transaction<'a> {
    /// Creates a Transaction struct
    pub(crate) fn new(
        conn: &'a mut Connection,
        trans_option: TransactionMode,
    ) -> Result<Transaction<'a>, RefcursorError> {
        let inner = conn
            .client
            .build_transaction()
            .read_only(trans_option == TransactionMode::ReadOnly)
            .start()
            .map_err(|source| RefcursorError::Query {
                context: String::from("BEGIN"),
                source,
            })?;
        debug!(mode = ?trans_option, "transaction started");
        Ok(Transaction {
            inner,
            mode: trans_option,
        })
    }

    /// Returns the [TransactionMode] the transaction was started with.
    pub fn get_mode(&self) -> TransactionMode {
        self.mode
    }

    /// Executes an SQL statement inside the transaction, in simple query mode.
    ///
    /// # Errors
    /// Returns [RefcursorError::Execute] when the statement fails.
    pub fn execute_statement(&mut self, sqlstatement: &str) -> Result<(), RefcursorError> {
        debug!(statement = sqlstatement, "executing");
        self.inner
            .batch_execute(sqlstatement)
            .map_err(|source| RefcursorError::Execute {
                statement: sqlstatement.to_owned(),
                source,
            })
    }

    /// Calls `routine` and returns the two cursor handles of its single result row, in column
    /// order `(a, b)`.
    ///
    /// # Errors
    /// Returns [RefcursorError::Query] when the call fails or doesn't produce exactly one row,
    /// [RefcursorError::Scan] when the columns aren't cursor names and
    /// [RefcursorError::DuplicateCursor] when both columns name the same cursor.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// let mut conn = Connection::open(&Config::from_env()).unwrap();
    /// let mut trans = conn.begin_transaction(TransactionMode::ReadWrite).unwrap();
    /// let (a, b) = trans.open_cursors(&RC_2).unwrap();
    /// println!("Got ref cursor: {a} and {b}");
    /// ```
    pub fn open_cursors(
        &mut self,
        routine: &Routine,
    ) -> Result<(CursorHandle, CursorHandle), RefcursorError> {
        let query = format!("SELECT a, b FROM {}()", routine.name);
        self.query_cursor_pair(&query, &[])
    }

    /// Calls a `routine` that takes the two cursor names as arguments, so the cursors are opened
    /// under `names` instead of server-generated names.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// let mut conn = Connection::open(&Config::from_env()).unwrap();
    /// let mut trans = conn.begin_transaction(TransactionMode::ReadWrite).unwrap();
    /// let names = (CursorHandle::generate("rc"), CursorHandle::generate("rc"));
    /// let (a, b) = trans.open_named_cursors(&RC_2_NAMED, (&names.0, &names.1)).unwrap();
    /// assert_eq!((a, b), names);
    /// ```
    pub fn open_named_cursors(
        &mut self,
        routine: &Routine,
        names: (&CursorHandle, &CursorHandle),
    ) -> Result<(CursorHandle, CursorHandle), RefcursorError> {
        let query = format!(
            "SELECT a, b FROM {}($1::text::refcursor, $2::text::refcursor)",
            routine.name
        );
        self.query_cursor_pair(&query, &[&names.0.name(), &names.1.name()])
    }

    fn query_cursor_pair(
        &mut self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<(CursorHandle, CursorHandle), RefcursorError> {
        debug!(query, "opening cursors");
        let row = self
            .inner
            .query_one(query, params)
            .map_err(|source| RefcursorError::Query {
                context: query.to_owned(),
                source,
            })?;

        let decode = |column: &str| {
            row.try_get::<_, CursorHandle>(column)
                .map_err(|source| RefcursorError::Scan {
                    cursor: format!("column {column} of {query}"),
                    source,
                })
        };
        let a = decode("a")?;
        let b = decode("b")?;

        if a == b {
            return Err(RefcursorError::DuplicateCursor {
                handle: a.to_string(),
            });
        }
        info!("Got ref cursor: {a} and {b}");
        Ok((a, b))
    }

    /// Fetches every remaining row of the cursor named by `handle`.
    ///
    /// The returned stream borrows the transaction, so it has to be drained (or
    /// [closed](CursorRows::close)) before the next cursor is fetched. Issuing a second fetch while
    /// the first stream is alive does not compile:
    /// ```compile_fail,E0499
    /// # use pgrefcursor::*;
    /// # fn demo(trans: &mut Transaction<'_>, a: &CursorHandle, b: &CursorHandle) -> Result<(), RefcursorError> {
    /// let mut rows_a = trans.fetch_all(a)?;
    /// let mut rows_b = trans.fetch_all(b)?;
    /// rows_a.next_row()?;
    /// # Ok(())
    /// # }
    /// ```
    /// Draining in order does:
    /// ```no_run
    /// # use pgrefcursor::*;
    /// # fn demo(trans: &mut Transaction<'_>, a: &CursorHandle, b: &CursorHandle) -> Result<(), RefcursorError> {
    /// let rows_a = trans.fetch_all(a)?.collect_rows::<TestRow>()?;
    /// let rows_b = trans.fetch_all(b)?.collect_rows::<Test2Row>()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns [RefcursorError::Query] when the fetch fails, e.g. if the cursor does not exist in
    /// this transaction. The first row is read before returning, so such errors surface here and
    /// not on the first [next_row](CursorRows::next_row).
    pub fn fetch_all(&mut self, handle: &CursorHandle) -> Result<CursorRows<'_>, RefcursorError> {
        let statement = handle.fetch_all_statement();
        debug!(%statement, "fetching");
        let rows = self
            .inner
            .query_raw(statement.as_str(), std::iter::empty::<&(dyn ToSql + Sync)>())
            .map_err(|source| RefcursorError::Query {
                context: handle.to_string(),
                source,
            })?;
        CursorRows::new(handle.clone(), rows)
    }

    /// Closes the cursor named by `handle` on the server.
    pub fn close_cursor(&mut self, handle: &CursorHandle) -> Result<(), RefcursorError> {
        let statement = handle.close_statement();
        debug!(%statement, "closing cursor");
        self.inner
            .batch_execute(&statement)
            .map_err(|source| RefcursorError::Query {
                context: handle.to_string(),
                source,
            })
    }

    /// Commits a [Transaction] into the database.
    /// This function consumes the transaction, and with it every cursor handle opened inside it.
    ///
    /// # Errors
    /// Returns [`Err`] when a transaction can't be commited.
    pub fn commit(self) -> Result<(), RefcursorError> {
        self.end_transaction(EndTransactionMode::Commit)
    }

    /// Rolls back a [Transaction] to the state of the database before the transaction was created.
    /// This function consumes the transaction.
    ///
    /// # Errors
    /// Returns [Err] when a transaction can't be rolled back.
    pub fn rollback(self) -> Result<(), RefcursorError> {
        self.end_transaction(EndTransactionMode::Rollback)
    }

    /// Ends a transaction
    fn end_transaction(self, trans_option: EndTransactionMode) -> Result<(), RefcursorError> {
        let result = match trans_option {
            EndTransactionMode::Commit => self.inner.commit(),
            EndTransactionMode::Rollback => self.inner.rollback(),
        };
        result.map_err(|source| RefcursorError::Query {
            context: String::from(trans_option.statement()),
            source,
        })?;
        debug!(statement = trans_option.statement(), "transaction ended");
        Ok(())
    }
}
