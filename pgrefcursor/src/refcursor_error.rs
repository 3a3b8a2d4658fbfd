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

use postgres::error::SqlState;
use thiserror::Error;

#[doc(hidden)]
use std::{error::Error as _, fmt::Write as _};

/// Represents an error occurring while setting up or consuming ref cursors.
///
/// Every failure aborts the whole run; the variants only tell apart where it happened.
#[derive(Debug, Error)]
pub enum RefcursorError {
    /// The connection locator is malformed or asks for something unsupported.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// The connection could not be opened.
    #[error("could not connect to {target}: {}", driver_message(.source))]
    Connect {
        target: String,
        #[source]
        source: postgres::Error,
    },

    /// A setup statement failed.
    #[error("error executing `{statement}`: {}", driver_message(.source))]
    Execute {
        statement: String,
        #[source]
        source: postgres::Error,
    },

    /// A query failed while cursors were being opened, fetched or released.
    #[error("error querying {context}: {}", driver_message(.source))]
    Query {
        context: String,
        #[source]
        source: postgres::Error,
    },

    /// A fetched row could not be decoded into its expected shape.
    #[error("error scanning {cursor}: {}", driver_message(.source))]
    Scan {
        cursor: String,
        #[source]
        source: postgres::Error,
    },

    /// The routine handed back the same cursor for both columns.
    #[error("routine returned the same ref cursor twice: {handle}")]
    DuplicateCursor { handle: String },
}

/// Renders a driver error with the server's own message, which the driver's `Display` leaves
/// out (it only says `db error`). Other errors are rendered with their whole cause chain.
fn driver_message(err: &postgres::Error) -> String {
    if let Some(db) = err.as_db_error() {
        let mut message = format!("{}: {}", db.severity(), db.message());
        if let Some(detail) = db.detail() {
            write!(message, " ({detail})").ok();
        }
        return message;
    }
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.ends_with(&text) {
            write!(message, ": {text}").ok();
        }
        cause = inner.source();
    }
    message
}

impl RefcursorError {
    fn driver_error(&self) -> Option<&postgres::Error> {
        match self {
            RefcursorError::Connect { source, .. }
            | RefcursorError::Execute { source, .. }
            | RefcursorError::Query { source, .. }
            | RefcursorError::Scan { source, .. } => Some(source),
            RefcursorError::Config { .. } | RefcursorError::DuplicateCursor { .. } => None,
        }
    }

    /// Gets the SQLSTATE reported by the server, if the error came from the server.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// use postgres::error::SqlState;
    ///
    /// let mut conn = Connection::open(&Config::from_env()).unwrap();
    /// let err = conn
    ///     .execute_statement("FETCH ALL FROM \"no such cursor\"")
    ///     .unwrap_err();
    /// assert_eq!(err.get_sqlstate(), Some(&SqlState::INVALID_CURSOR_NAME));
    /// ```
    pub fn get_sqlstate(&self) -> Option<&SqlState> {
        self.driver_error().and_then(|err| err.code())
    }

    /// Gets the full error message.
    pub fn get_error_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn config_error_message() {
        let err = RefcursorError::Config {
            reason: String::from("TLS mode Require is not supported"),
        };
        assert_eq!(
            err.get_error_message(),
            "invalid configuration: TLS mode Require is not supported"
        );
        assert!(err.get_sqlstate().is_none());
    }

    #[test]
    fn duplicate_cursor_message() {
        let err = RefcursorError::DuplicateCursor {
            handle: String::from("<unnamed portal 1>"),
        };
        assert_eq!(
            err.to_string(),
            "routine returned the same ref cursor twice: <unnamed portal 1>"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
