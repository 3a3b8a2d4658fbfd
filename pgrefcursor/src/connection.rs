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
    common::options::TransactionMode, config::describe_target, Config, RefcursorError,
    Transaction,
};
use postgres::{Client, NoTls};
use tracing::{debug, info};

/// Represents a connection to a PostgreSQL database.
pub struct Connection {
    pub(crate) client: Client,
    target: String,
}

impl Connection {
    /// Opens a connection to a PostgreSQL database.
    ///
    /// # Errors
    /// Returns [RefcursorError::Config] when the locator can't be used and
    /// [RefcursorError::Connect] when the connection failed to open.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// let conn = Connection::open(&Config::from_env()).unwrap();
    /// ```
    pub fn open(config: &Config) -> Result<Connection, RefcursorError> {
        let pg_config = config.parse()?;
        let target = describe_target(&pg_config);

        debug!(%target, "opening connection");
        let client = pg_config
            .connect(NoTls)
            .map_err(|source| RefcursorError::Connect {
                target: target.clone(),
                source,
            })?;
        info!(%target, "connected");

        Ok(Connection { client, target })
    }

    /// Returns the `user@host/dbname` this connection was opened against.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Executes an SQL statement on the database. Mainly used for DDL statements.
    /// The statement runs in simple query mode, so it may hold several `;`-separated commands but
    /// can't take bind parameters.
    ///
    /// # Errors
    /// Returns [RefcursorError::Execute] when the statement fails, e.g. if it contained a syntax error.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// let mut conn = Connection::open(&Config::from_env()).unwrap();
    /// conn.execute_statement("CREATE TABLE IF NOT EXISTS test (id integer, s text)").unwrap();
    /// ```
    pub fn execute_statement(&mut self, sqlstatement: &str) -> Result<(), RefcursorError> {
        debug!(statement = sqlstatement, "executing");
        self.client
            .batch_execute(sqlstatement)
            .map_err(|source| RefcursorError::Execute {
                statement: sqlstatement.to_owned(),
                source,
            })
    }

    /// Initiates a database transaction. Ref cursors only live as long as the transaction that
    /// opened them, so they have to be opened and fetched through the returned [Transaction].
    ///
    /// # Errors
    /// Returns [Err] when a transaction can't be started on the connection.
    ///
    /// # Examples
    /// ```no_run
    /// # use pgrefcursor::*;
    /// let mut conn = Connection::open(&Config::from_env()).unwrap();
    /// let trans = conn.begin_transaction(TransactionMode::ReadWrite).unwrap();
    ///
    /// // Open and fetch ref cursors
    ///
    /// trans.commit().unwrap();
    /// ```
    pub fn begin_transaction(
        &mut self,
        trans_option: TransactionMode,
    ) -> Result<Transaction<'_>, RefcursorError> {
        Transaction::new(self, trans_option)
    }

    /// Returns true if the underlying session has been closed, e.g. by the server.
    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }
}
