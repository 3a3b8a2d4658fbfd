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

//! Server-side routines returning ref cursors over the fixture tables.

use crate::{Connection, RefcursorError};
use tracing::info;

/// A PL/pgSQL function returning a single row of two `refcursor` columns `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routine {
    pub name: &'static str,
    pub definition: &'static str,
}

/// Opens a cursor over `test` and one over `test2`, named by the server.
pub const RC_2: Routine = Routine {
    name: "rc_2",
    definition: "
CREATE OR REPLACE FUNCTION rc_2()
RETURNS TABLE(a refcursor, b refcursor)
AS
$$
BEGIN
    OPEN a FOR SELECT * FROM test;
    OPEN b FOR SELECT * FROM test2;
    RETURN NEXT;
END;
$$
LANGUAGE plpgsql;
",
};

/// Like [RC_2], but the cursors are opened under the names passed as arguments.
pub const RC_2_NAMED: Routine = Routine {
    name: "rc_2_named",
    definition: "
CREATE OR REPLACE FUNCTION rc_2_named(name_a refcursor, name_b refcursor)
RETURNS TABLE(a refcursor, b refcursor)
AS
$$
BEGIN
    a := name_a;
    b := name_b;
    OPEN a FOR SELECT * FROM test;
    OPEN b FOR SELECT * FROM test2;
    RETURN NEXT;
END;
$$
LANGUAGE plpgsql;
",
};

/// Every routine installed by [install_routines].
pub const ROUTINES: [Routine; 2] = [RC_2, RC_2_NAMED];

/// Installs (or replaces) a routine.
pub fn install_routine(conn: &mut Connection, routine: &Routine) -> Result<(), RefcursorError> {
    conn.execute_statement(routine.definition)?;
    info!(routine = routine.name, "routine installed");
    Ok(())
}

/// Installs (or replaces) every routine in [ROUTINES].
///
/// # Examples
/// ```no_run
/// # use pgrefcursor::*;
/// let mut conn = Connection::open(&Config::from_env()).unwrap();
/// fixtures::setup_tables(&mut conn).unwrap();
/// routines::install_routines(&mut conn).unwrap();
/// ```
pub fn install_routines(conn: &mut Connection) -> Result<(), RefcursorError> {
    for routine in &ROUTINES {
        install_routine(conn, routine)?;
    }
    Ok(())
}

#[cfg(test)]
mod routines_tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn definitions_match_names() {
        for routine in &ROUTINES {
            assert!(routine
                .definition
                .contains(&format!("CREATE OR REPLACE FUNCTION {}(", routine.name)));
            assert!(routine
                .definition
                .contains("RETURNS TABLE(a refcursor, b refcursor)"));
        }
    }

    #[ignore = "requires a PostgreSQL server, see PGREFCURSOR_DATABASE"]
    #[test]
    fn install_twice() {
        let _lck = lock_fixture_tables();
        let mut conn = establish_connection();
        crate::fixtures::setup_tables(&mut conn).unwrap();
        install_routines(&mut conn).unwrap();
        install_routines(&mut conn).unwrap();
    }

    #[ignore = "requires a PostgreSQL server, see PGREFCURSOR_DATABASE"]
    #[test]
    fn install_invalid_routine() {
        let mut conn = establish_connection();
        let broken = Routine {
            name: "rc_broken",
            definition: "CREATE OR REPLACE FUNCTION rc_broken() RETURNS refcursor AS $$ BEGIN OPEN $$",
        };
        match install_routine(&mut conn, &broken) {
            Err(RefcursorError::Execute { statement, .. }) => {
                assert_eq!(statement, broken.definition)
            }
            Err(err) => panic!("Unexpected error: {err}"),
            Ok(_) => panic!("Installed a routine with a broken definition"),
        }
    }
}
