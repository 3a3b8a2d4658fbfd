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

//! This crate shows how to read PostgreSQL ref cursors returned by a stored function from Rust.
//!
//! A PL/pgSQL function can open cursors and hand their names back as `refcursor` values. The
//! cursors belong to the transaction that opened them, which makes the client side of the protocol
//! strict about ordering:
//! 1. Begin a transaction. Outside of one, each statement commits on its own and the cursors are
//!    gone before they can be fetched.
//! 2. Call the function and read the cursor names from its result row.
//! 3. Fetch each cursor with `FETCH ALL FROM "<name>"`, the name embedded in the statement text.
//!    Drain (or discard) one result stream before fetching the next.
//! 4. Commit once every stream has been read.
//!
//! The crate is built on the synchronous [postgres](https://docs.rs/postgres) client. [Transaction]
//! borrows the [Connection] and [CursorRows] borrows the [Transaction], so fetching a second
//! cursor while a stream is still open, or after the transaction ended, is rejected by the compiler.
//!
//! The whole demonstration looks like this:
//! ```no_run
//! use pgrefcursor::*;
//!
//! fn main() -> Result<(), RefcursorError> {
//!     let mut conn = Connection::open(&Config::from_env())?;
//!     fixtures::setup_tables(&mut conn)?;
//!     routines::install_routines(&mut conn)?;
//!
//!     let mut trans = conn.begin_transaction(TransactionMode::ReadWrite)?;
//!     let (a, b) = trans.open_cursors(&RC_2)?;
//!
//!     let mut rows = trans.fetch_all(&a)?;
//!     while let Some(row) = rows.next_decoded::<TestRow>()? {
//!         println!("Row: {row}");
//!     }
//!     drop(rows);
//!
//!     for row in trans.fetch_all(&b)?.collect_rows::<Test2Row>()? {
//!         println!("Row: {row}");
//!     }
//!
//!     trans.commit()?;
//!     Ok(())
//! }
//! ```
//! The connection locator is read from the `PGREFCURSOR_DATABASE` environment variable and
//! defaults to [Config::DEFAULT_URL]. The tests that need a server are ignored by default; run
//! them with `cargo test -- --ignored` against a database the configured user may create tables
//! and functions in.
//!

pub(crate) mod common;
pub(crate) mod config;
pub(crate) mod connection;
pub(crate) mod cursor;
pub(crate) mod protocol;
pub(crate) mod refcursor_error;
pub(crate) mod row;
#[cfg(test)]
pub(crate) mod testing;
pub(crate) mod transaction;

pub mod fixtures;
pub mod routines;

pub use common::options::*;
pub use common::sql::quote_identifier;
pub use config::{Config, DATABASE_ENV};
pub use connection::Connection;
pub use cursor::{CursorHandle, CursorRows};
pub use protocol::{consume_ref_cursors, run, CursorReport};
pub use refcursor_error::RefcursorError;
pub use routines::{Routine, RC_2, RC_2_NAMED};
pub use row::{FromCursorRow, Test2Row, TestRow};
pub use transaction::Transaction;
