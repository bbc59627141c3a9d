//! Identifier quoting for the supported DDL dialect.
//!
//! The printers in this crate emit names verbatim; callers composing a schema
//! quote raw identifiers with these helpers *before* handing them to the
//! builders, so that the printed DDL is syntactically safe.

use crate::dialect::Dialect;
use crate::errors::GraphDdlError;

/// Quote an identifier (table, column, label or property name) if it contains
/// characters that are unsafe unquoted in GoogleSQL-like DDL.
///
/// Plain identifiers pass through unchanged, so quoting is stable under
/// repeated application for names that need no quoting.
///
/// # Examples
/// ```
/// use graphddl::{quoting::quote_identifier, Dialect};
/// assert_eq!(quote_identifier("user_id", Dialect::GoogleStandardSql).unwrap(), "user_id");
/// assert_eq!(quote_identifier("user-name", Dialect::GoogleStandardSql).unwrap(), "`user-name`");
/// ```
///
/// # Errors
///
/// Returns [`GraphDdlError::DialectMismatch`] for any dialect other than the
/// supported one.
pub fn quote_identifier(name: &str, dialect: Dialect) -> Result<String, GraphDdlError> {
    if !dialect.supports_property_graph_ddl() {
        return Err(GraphDdlError::DialectMismatch { dialect });
    }
    if needs_quoting(name) {
        Ok(format!("`{}`", name))
    } else {
        Ok(name.to_string())
    }
}

fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || name.chars().next().is_some_and(|c| c.is_ascii_digit())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
