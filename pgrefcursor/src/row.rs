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

use postgres::Row;

#[doc(hidden)]
use std::fmt;

/// Defines how a row fetched from a ref cursor is decoded into a Rust value.
///
/// Implement it for the shape a cursor is expected to produce, then decode with
/// [next_decoded](crate::CursorRows::next_decoded) or [collect_rows](crate::CursorRows::collect_rows):
/// ```
/// use pgrefcursor::FromCursorRow;
/// use postgres::Row;
///
/// struct OnlyId(i32);
///
/// impl FromCursorRow for OnlyId {
///     fn from_cursor_row(row: &Row) -> Result<Self, postgres::Error> {
///         Ok(OnlyId(row.try_get(0)?))
///     }
/// }
/// ```
pub trait FromCursorRow: Sized {
    fn from_cursor_row(row: &Row) -> Result<Self, postgres::Error>;
}

/// A row of the `test` fixture table: `(id integer, s text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub id: i32,
    pub s: String,
}

impl TestRow {
    pub fn new(id: i32, s: &str) -> TestRow {
        TestRow {
            id,
            s: s.to_owned(),
        }
    }
}

impl FromCursorRow for TestRow {
    fn from_cursor_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(TestRow {
            id: row.try_get(0)?,
            s: row.try_get(1)?,
        })
    }
}

impl fmt::Display for TestRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.s)
    }
}

/// A row of the `test2` fixture table: `(a text, b text, c text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test2Row {
    pub a: String,
    pub b: String,
    pub c: String,
}

impl Test2Row {
    pub fn new(a: &str, b: &str, c: &str) -> Test2Row {
        Test2Row {
            a: a.to_owned(),
            b: b.to_owned(),
            c: c.to_owned(),
        }
    }
}

impl FromCursorRow for Test2Row {
    fn from_cursor_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Test2Row {
            a: row.try_get(0)?,
            b: row.try_get(1)?,
            c: row.try_get(2)?,
        })
    }
}

impl fmt::Display for Test2Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.a, self.b, self.c)
    }
}
