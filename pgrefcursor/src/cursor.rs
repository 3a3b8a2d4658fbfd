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

use crate::{common::sql::quote_identifier, row::FromCursorRow, RefcursorError};
use postgres::{
    fallible_iterator::FallibleIterator,
    types::{FromSql, Type},
    Row, RowIter,
};
use tracing::debug;
use uuid::Uuid;

#[doc(hidden)]
use fallible_streaming_iterator::FallibleStreamingIterator;
#[doc(hidden)]
use std::{error::Error, fmt};

/// The name of a server-side cursor (a portal), as returned in a `refcursor` column.
///
/// A handle is only meaningful inside the transaction that opened the cursor. The server's
/// fetch syntax can't take the name as a bind parameter, so the name is embedded into the
/// statement text as a quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorHandle(String);

impl CursorHandle {
    /// Wraps a cursor name.
    pub fn new(name: impl Into<String>) -> CursorHandle {
        CursorHandle(name.into())
    }

    /// Builds a fresh cursor name of the form `<prefix>_<uuid>`, for routines that open their
    /// cursors under caller-supplied names.
    pub fn generate(prefix: &str) -> CursorHandle {
        CursorHandle(format!("{prefix}_{}", Uuid::new_v4().simple()))
    }

    /// Returns the cursor name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the statement fetching every remaining row of the cursor.
    ///
    /// # Examples
    /// ```
    /// # use pgrefcursor::CursorHandle;
    /// let handle = CursorHandle::new("<unnamed portal 1>");
    /// assert_eq!(handle.fetch_all_statement(), "FETCH ALL FROM \"<unnamed portal 1>\"");
    /// ```
    pub fn fetch_all_statement(&self) -> String {
        format!("FETCH ALL FROM {}", quote_identifier(&self.0))
    }

    /// Returns the statement closing the cursor.
    pub fn close_statement(&self) -> String {
        format!("CLOSE {}", quote_identifier(&self.0))
    }
}

impl fmt::Display for CursorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> FromSql<'a> for CursorHandle {
    fn from_sql(_: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        // refcursor shares the text wire format in both directions
        Ok(CursorHandle(std::str::from_utf8(raw)?.to_owned()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::REFCURSOR | Type::TEXT | Type::VARCHAR | Type::NAME | Type::UNKNOWN
        )
    }
}

/// The rows returned by one `FETCH` against a ref cursor.
///
/// The stream mutably borrows the [Transaction](crate::Transaction) it was fetched through, so no
/// other statement can be issued on the transaction until the stream is drained and dropped, or
/// discarded with [close](CursorRows::close).
pub struct CursorRows<'t> {
    handle: CursorHandle,
    rows: RowIter<'t>,
    row: Option<Row>, // To store the current row
    // First step of the stream, read when the stream is created
    prefetched: Option<Option<Row>>,
    fetched: u64,
    drained: bool,
}

impl<'t> CursorRows<'t> {
    /// Reads the first row right away, so a fetch against a cursor that does not exist fails
    /// here instead of on the first [next_row](CursorRows::next_row).
    pub(crate) fn new(
        handle: CursorHandle,
        mut rows: RowIter<'t>,
    ) -> Result<CursorRows<'t>, RefcursorError> {
        let first = rows.next().map_err(|source| RefcursorError::Query {
            context: handle.to_string(),
            source,
        })?;
        Ok(CursorRows {
            handle,
            rows,
            row: None,
            prefetched: Some(first),
            fetched: 0,
            drained: false,
        })
    }

    fn step(&mut self, next: Option<Row>) {
        match next {
            Some(row) => {
                self.fetched += 1;
                self.row = Some(row);
            }
            None => {
                self.drained = true;
                self.row = None;
            }
        }
    }

    /// Returns the handle of the cursor these rows were fetched from.
    pub fn handle(&self) -> &CursorHandle {
        &self.handle
    }

    /// Moves to the next row of the stream and returns it.
    /// On success, returns either Some([Row]) or [None] if the stream is drained.
    ///
    /// # Errors
    /// Returns [RefcursorError::Query] when the next row could not be read.
    pub fn next_row(&mut self) -> Result<Option<&Row>, RefcursorError> {
        self.next()
    }

    /// Moves to the next row and decodes it as `T`.
    ///
    /// # Errors
    /// Returns [RefcursorError::Scan] when the row does not have the shape of `T`.
    pub fn next_decoded<T: FromCursorRow>(&mut self) -> Result<Option<T>, RefcursorError> {
        self.advance()?;
        match &self.row {
            Some(row) => T::from_cursor_row(row)
                .map(Some)
                .map_err(|source| RefcursorError::Scan {
                    cursor: self.handle.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Drains the stream, decoding every row as `T`.
    pub fn collect_rows<T: FromCursorRow>(mut self) -> Result<Vec<T>, RefcursorError> {
        let mut decoded = Vec::new();
        while let Some(row) = self.next_decoded::<T>()? {
            decoded.push(row);
        }
        Ok(decoded)
    }

    /// Returns the number of rows read from the stream so far.
    pub fn rows_fetched(&self) -> u64 {
        self.fetched
    }

    /// Returns true once the last row has been read.
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    /// Returns the row count reported by the server. Only available once the stream is drained.
    pub fn rows_affected(&self) -> Option<u64> {
        self.rows.rows_affected()
    }

    /// Discards the rest of the stream so another statement can be issued on the transaction.
    /// The cursor itself stays open on the server.
    pub fn close(self) {
        if !self.drained {
            debug!(cursor = %self.handle, fetched = self.fetched, "discarding unread rows");
        }
    }
}

impl FallibleStreamingIterator for CursorRows<'_> {
    type Error = RefcursorError;
    type Item = Row;

    fn advance(&mut self) -> Result<(), Self::Error> {
        if let Some(first) = self.prefetched.take() {
            self.step(first);
            return Ok(());
        }
        if self.drained {
            self.row = None;
            return Ok(());
        }
        let next = self.rows.next().map_err(|source| RefcursorError::Query {
            context: self.handle.to_string(),
            source,
        })?;
        self.step(next);
        Ok(())
    }

    fn get(&self) -> Option<&Self::Item> {
        self.row.as_ref()
    }
}
