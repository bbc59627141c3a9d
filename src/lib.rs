//! graphddl - Schema model for property graphs declared over relational tables
//!
//! This crate represents, in memory, the structural elements of a declared
//! property graph - node tables, edge tables, key columns, label-to-property
//! mappings, and graph-level property declarations - and serializes that
//! model back into canonical `CREATE PROPERTY GRAPH` DDL text, byte-for-byte
//! stable for schema diffing and migration tooling.
//!
//! Construction goes through builders: element tables are built and validated
//! independently, then registered into a [`PropertyGraphBuilder`] whose
//! `build()` checks kind consistency, dialect consistency, and edge endpoint
//! references. Built values are immutable; printing never mutates state and
//! is safe from any number of threads.
//!
//! ```
//! use graphddl::{ElementKind, GraphElementTable, PropertyGraph};
//!
//! let person = GraphElementTable::builder()
//!     .name("Person")
//!     .base_table_name("Person")
//!     .kind(ElementKind::Node)
//!     .key_columns(vec!["id".to_string()])
//!     .build()
//!     .unwrap();
//! let graph = PropertyGraph::builder()
//!     .name("G")
//!     .add_node_table(person)
//!     .build()
//!     .unwrap();
//! let ddl = graph.pretty_print().unwrap();
//! assert!(ddl.starts_with("CREATE PROPERTY GRAPH G"));
//! ```

pub mod dialect;
pub mod element_table;
pub mod errors;
pub mod property_graph;
pub mod quoting;

// Re-export commonly used types
pub use dialect::Dialect;
pub use element_table::{
    ElementKind, GraphElementTable, GraphElementTableBuilder, GraphNodeTableReference,
    LabelToPropertyDefinitions, PropertyDefinition,
};
pub use errors::GraphDdlError;
pub use property_graph::{
    GraphElementLabel, PropertyDeclaration, PropertyGraph, PropertyGraphBuilder,
};
