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

/// Defines enums of options for methods that need them.
pub mod options {
    /// Transaction mode options.
    #[derive(Debug, PartialEq, Clone, Copy)]
    pub enum TransactionMode {
        ReadOnly,
        ReadWrite,
    }

    /// End transaction mode options.
    #[derive(Debug, PartialEq, Clone, Copy)]
    pub(crate) enum EndTransactionMode {
        Rollback,
        Commit,
    }

    impl EndTransactionMode {
        pub(crate) fn statement(&self) -> &'static str {
            match self {
                EndTransactionMode::Rollback => "ROLLBACK",
                EndTransactionMode::Commit => "COMMIT",
            }
        }
    }
}

/// Helpers for building statement text that can't carry bind parameters.
pub mod sql {
    /// Quotes `name` as a PostgreSQL identifier, doubling any embedded double quote.
    ///
    /// # Examples
    /// ```
    /// use pgrefcursor::quote_identifier;
    ///
    /// assert_eq!(quote_identifier("<unnamed portal 1>"), "\"<unnamed portal 1>\"");
    /// assert_eq!(quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
    /// ```
    pub fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn quote_plain_name() {
            assert_eq!(quote_identifier("test"), "\"test\"");
        }

        #[test]
        fn quote_server_generated_portal() {
            assert_eq!(
                quote_identifier("<unnamed portal 12>"),
                "\"<unnamed portal 12>\""
            );
        }

        #[test]
        fn quote_embedded_quotes() {
            assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
            assert_eq!(quote_identifier("\""), "\"\"\"\"");
        }

        #[test]
        fn quote_empty() {
            assert_eq!(quote_identifier(""), "\"\"");
        }
    }
}
