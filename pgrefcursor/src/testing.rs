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

#![allow(dead_code)]

use crate::{fixtures, routines, Config, Connection};

#[doc(hidden)]
use lazy_static::lazy_static;
#[doc(hidden)]
use parking_lot::{Mutex, MutexGuard};

lazy_static! {
    static ref FIXTURE_TABLES_MTX: Mutex<()> = Mutex::new(());
}

/// Serializes tests that reset or read the fixed fixture tables.
pub fn lock_fixture_tables() -> MutexGuard<'static, ()> {
    FIXTURE_TABLES_MTX.lock()
}

/// Sets up connection to the db named by the environment variable PGREFCURSOR_DATABASE, or the default locator.
pub fn establish_connection() -> Connection {
    Connection::open(&Config::from_env()).unwrap_or_else(|err| panic!("Connection failed: {err}"))
}

/// Locks the fixture tables, then connects, resets the tables and installs the routines.
/// Hold on to the guard for as long as the test uses the tables.
pub fn establish_fixture_connection() -> (MutexGuard<'static, ()>, Connection) {
    let lck = lock_fixture_tables();
    let mut conn = establish_connection();
    fixtures::setup_tables(&mut conn).unwrap_or_else(|err| panic!("Setup failed: {err}"));
    routines::install_routines(&mut conn)
        .unwrap_or_else(|err| panic!("Installing routines failed: {err}"));
    (lck, conn)
}

/// Drops both fixture tables. Used for starting tests from an empty database.
pub fn drop_fixture_tables(conn: &mut Connection) {
    for table in [fixtures::TEST_TABLE, fixtures::TEST2_TABLE] {
        conn.execute_statement(&format!("DROP TABLE IF EXISTS {table}"))
            .unwrap_or_else(|err| panic!("Dropping {table} failed: {err}"));
    }
}
