//! Error types for property graph schema assembly and DDL printing.
//!
//! Build-time variants report structural problems caught when a builder is
//! finalized; print-time variants report problems that only surface when an
//! already-built object is rendered to DDL text. All failures are synchronous
//! and unwind to the immediate caller - nothing here is retryable.

use crate::dialect::Dialect;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphDdlError {
    #[error("Unrecognized dialect: {dialect} (only GOOGLE_STANDARD_SQL DDL can be printed)")]
    DialectMismatch { dialect: Dialect },
    #[error("Missing required field '{field}' on {object}")]
    MissingRequiredField { object: String, field: &'static str },
    #[error("Element table '{table}' has no key columns (at least one is required)")]
    EmptyKeyColumns { table: String },
    #[error("Edge table '{table}' is missing its {endpoint} node reference")]
    MissingEndpoint { table: String, endpoint: &'static str },
    #[error("{kind} table '{table}' must not carry a {endpoint} node reference (edges only)")]
    UnexpectedEndpoint {
        kind: &'static str,
        table: String,
        endpoint: &'static str,
    },
    #[error(
        "Edge table '{table}': {endpoint} reference to '{node_table}' has {edge_count} edge key \
         column(s) against {node_count} node key column(s) (lists must correspond positionally)"
    )]
    KeyColumnCountMismatch {
        table: String,
        endpoint: &'static str,
        node_table: String,
        edge_count: usize,
        node_count: usize,
    },
    #[error("Element table '{table}' has kind {actual} but was registered as a {expected} table")]
    KindMismatch {
        table: String,
        expected: &'static str,
        actual: String,
    },
    #[error("Element table '{table}' was built under dialect {table_dialect} but the graph uses {graph_dialect}")]
    DialectMixture {
        table: String,
        table_dialect: Dialect,
        graph_dialect: Dialect,
    },
    #[error(
        "Edge table '{edge_table}': {endpoint} reference names node table '{node_table}', which \
         is not defined in this graph (define the node table before the edge)"
    )]
    UnknownNodeReference {
        edge_table: String,
        endpoint: &'static str,
        node_table: String,
    },
}
