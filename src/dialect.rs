//! SQL dialect tags for property graph DDL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target SQL dialect of a schema object.
///
/// Only [`Dialect::GoogleStandardSql`] can be rendered to DDL text; objects
/// may be *built* under any dialect, and the mismatch surfaces when printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    GoogleStandardSql,
    Postgresql,
}

impl Dialect {
    /// Whether DDL can be emitted for this dialect.
    pub fn supports_property_graph_ddl(&self) -> bool {
        matches!(self, Dialect::GoogleStandardSql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::GoogleStandardSql => f.write_str("GOOGLE_STANDARD_SQL"),
            Dialect::Postgresql => f.write_str("POSTGRESQL"),
        }
    }
}
