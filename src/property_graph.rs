//! The root property graph aggregate and its builder.
//!
//! A [`PropertyGraph`] owns ordered collections of node tables, edge tables,
//! graph-level property declarations, and graph-level labels. Each of the
//! four collections is an independent namespace with case-insensitive name
//! uniqueness. The builder validates kind consistency, dialect consistency,
//! and edge endpoint references once at `build()` time; the built graph is
//! immutable and prints the full `CREATE PROPERTY GRAPH` statement.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::element_table::{ElementKind, GraphElementTable};
use crate::errors::GraphDdlError;

/// A graph-level label and the ordered property names it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphElementLabel {
    pub name: String,
    pub properties: Vec<String>,
}

impl GraphElementLabel {
    pub fn new(name: impl Into<String>, properties: Vec<String>) -> Self {
        GraphElementLabel {
            name: name.into(),
            properties,
        }
    }
}

/// A graph-level property declaration: name and declared SQL type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    pub property_type: String,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        PropertyDeclaration {
            name: name.into(),
            property_type: property_type.into(),
        }
    }
}

/// An immutable property graph schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyGraph {
    name: String,
    dialect: Dialect,
    node_tables: Vec<GraphElementTable>,
    edge_tables: Vec<GraphElementTable>,
    property_declarations: Vec<PropertyDeclaration>,
    labels: Vec<GraphElementLabel>,
}

impl PropertyGraph {
    /// Builder under the default (supported) dialect.
    pub fn builder() -> PropertyGraphBuilder {
        Self::builder_with_dialect(Dialect::default())
    }

    pub fn builder_with_dialect(dialect: Dialect) -> PropertyGraphBuilder {
        PropertyGraphBuilder {
            name: String::new(),
            dialect,
            node_tables: OrderedByName::new(),
            edge_tables: OrderedByName::new(),
            property_declarations: OrderedByName::new(),
            labels: OrderedByName::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn node_tables(&self) -> &[GraphElementTable] {
        &self.node_tables
    }

    pub fn edge_tables(&self) -> &[GraphElementTable] {
        &self.edge_tables
    }

    pub fn property_declarations(&self) -> &[PropertyDeclaration] {
        &self.property_declarations
    }

    pub fn labels(&self) -> &[GraphElementLabel] {
        &self.labels
    }

    /// Seed a fresh builder with this graph's current contents.
    pub fn to_builder(&self) -> PropertyGraphBuilder {
        let mut builder = Self::builder_with_dialect(self.dialect).name(self.name.clone());
        for table in &self.node_tables {
            builder = builder.add_node_table(table.clone());
        }
        for table in &self.edge_tables {
            builder = builder.add_edge_table(table.clone());
        }
        for declaration in &self.property_declarations {
            builder = builder.add_property_declaration(declaration.clone());
        }
        for label in &self.labels {
            builder = builder.add_label(label.clone());
        }
        builder
    }

    /// Render the full `CREATE PROPERTY GRAPH` statement.
    ///
    /// Output is fully buffered: a child table's print failure aborts the
    /// whole statement and nothing partial reaches the caller. Graph-level
    /// property declarations and labels are held in the model but not
    /// emitted; they are implicit in the per-table label clauses.
    ///
    /// # Errors
    ///
    /// - [`GraphDdlError::MissingRequiredField`] - the graph has no name
    /// - [`GraphDdlError::DialectMismatch`] - this graph (or any owned
    ///   element table) was built under a dialect that cannot be printed
    pub fn pretty_print(&self) -> Result<String, GraphDdlError> {
        if self.name.is_empty() {
            return Err(GraphDdlError::MissingRequiredField {
                object: "property graph".to_string(),
                field: "name",
            });
        }
        if !self.dialect.supports_property_graph_ddl() {
            return Err(GraphDdlError::DialectMismatch {
                dialect: self.dialect,
            });
        }

        let mut out = String::new();
        out.push_str("CREATE PROPERTY GRAPH ");
        out.push_str(&self.name);
        out.push_str("\nNODE TABLES(\n");
        Self::write_tables(&self.node_tables, &mut out)?;
        out.push(')');
        out.push_str("\nEDGE TABLES(\n");
        Self::write_tables(&self.edge_tables, &mut out)?;
        out.push_str(");");
        Ok(out)
    }

    fn write_tables(tables: &[GraphElementTable], out: &mut String) -> Result<(), GraphDdlError> {
        for (i, table) in tables.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            table.write_ddl(out)?;
        }
        Ok(())
    }
}

/// Insertion-ordered accumulator keyed by lowercased name.
///
/// Re-inserting an existing key replaces the value in place, keeping the
/// first insertion's position (ordered-map replace semantics).
#[derive(Debug, Clone)]
struct OrderedByName<T> {
    entries: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T> OrderedByName<T> {
    fn new() -> Self {
        OrderedByName {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Returns true when an existing entry was overwritten.
    fn insert(&mut self, name: &str, value: T) -> bool {
        match self.positions.get(&name.to_lowercase()) {
            Some(&position) => {
                self.entries[position] = value;
                true
            }
            None => {
                self.positions.insert(name.to_lowercase(), self.entries.len());
                self.entries.push(value);
                false
            }
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(&name.to_lowercase())
    }

    fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

/// Accumulates the contents of a [`PropertyGraph`]; consumed by
/// [`build`](PropertyGraphBuilder::build).
///
/// Element tables are constructed independently and passed in whole - the
/// element builder holds no back-reference to this one.
#[derive(Debug, Clone)]
pub struct PropertyGraphBuilder {
    name: String,
    dialect: Dialect,
    node_tables: OrderedByName<GraphElementTable>,
    edge_tables: OrderedByName<GraphElementTable>,
    property_declarations: OrderedByName<PropertyDeclaration>,
    labels: OrderedByName<GraphElementLabel>,
}

impl PropertyGraphBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a node table under its element name. A case-insensitive name
    /// collision overwrites the earlier entry in place.
    pub fn add_node_table(mut self, table: GraphElementTable) -> Self {
        let key = table.element_name().to_string();
        if self.node_tables.insert(&key, table) {
            log::debug!(
                "node table '{}' overwritten on name collision in graph '{}'",
                key,
                self.name
            );
        }
        self
    }

    /// Register an edge table under its element name; same collision policy
    /// as node tables, in a separate namespace.
    pub fn add_edge_table(mut self, table: GraphElementTable) -> Self {
        let key = table.element_name().to_string();
        if self.edge_tables.insert(&key, table) {
            log::debug!(
                "edge table '{}' overwritten on name collision in graph '{}'",
                key,
                self.name
            );
        }
        self
    }

    pub fn add_property_declaration(mut self, declaration: PropertyDeclaration) -> Self {
        let key = declaration.name.clone();
        self.property_declarations.insert(&key, declaration);
        self
    }

    pub fn add_label(mut self, label: GraphElementLabel) -> Self {
        let key = label.name.clone();
        self.labels.insert(&key, label);
        self
    }

    /// Validate and freeze the graph.
    ///
    /// # Errors
    ///
    /// - [`GraphDdlError::KindMismatch`] - a node-table slot holding a
    ///   non-NODE element, or an edge slot holding a non-EDGE one
    /// - [`GraphDdlError::DialectMixture`] - an element table built under a
    ///   different dialect than the graph's
    /// - [`GraphDdlError::UnknownNodeReference`] - an edge endpoint naming a
    ///   node table absent from this graph
    pub fn build(self) -> Result<PropertyGraph, GraphDdlError> {
        for table in &self.node_tables.entries {
            Self::check_kind(table, ElementKind::Node, "node")?;
            Self::check_dialect(table, self.dialect)?;
        }
        for table in &self.edge_tables.entries {
            Self::check_kind(table, ElementKind::Edge, "edge")?;
            Self::check_dialect(table, self.dialect)?;
            for (reference, endpoint) in [
                (table.source_node_table(), "source"),
                (table.target_node_table(), "destination"),
            ] {
                // build() on the element guarantees both references exist.
                if let Some(reference) = reference {
                    if !self.node_tables.contains(&reference.node_table_name) {
                        return Err(GraphDdlError::UnknownNodeReference {
                            edge_table: table.element_name().to_string(),
                            endpoint,
                            node_table: reference.node_table_name.clone(),
                        });
                    }
                }
            }
        }

        log::debug!(
            "built property graph '{}' ({} node table(s), {} edge table(s))",
            self.name,
            self.node_tables.entries.len(),
            self.edge_tables.entries.len()
        );
        Ok(PropertyGraph {
            name: self.name,
            dialect: self.dialect,
            node_tables: self.node_tables.into_entries(),
            edge_tables: self.edge_tables.into_entries(),
            property_declarations: self.property_declarations.into_entries(),
            labels: self.labels.into_entries(),
        })
    }

    fn check_kind(
        table: &GraphElementTable,
        expected: ElementKind,
        slot: &'static str,
    ) -> Result<(), GraphDdlError> {
        if table.kind() != expected {
            return Err(GraphDdlError::KindMismatch {
                table: table.element_name().to_string(),
                expected: slot,
                actual: table.kind().to_string(),
            });
        }
        Ok(())
    }

    fn check_dialect(table: &GraphElementTable, graph_dialect: Dialect) -> Result<(), GraphDdlError> {
        if table.dialect() != graph_dialect {
            return Err(GraphDdlError::DialectMixture {
                table: table.element_name().to_string(),
                table_dialect: table.dialect(),
                graph_dialect,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_table::{
        GraphNodeTableReference, LabelToPropertyDefinitions, PropertyDefinition,
    };

    fn node(name: &str) -> GraphElementTable {
        GraphElementTable::builder()
            .name(name)
            .base_table_name(name)
            .kind(ElementKind::Node)
            .key_columns(vec!["id".to_string()])
            .build()
            .unwrap()
    }

    fn edge(name: &str, source: &str, target: &str) -> GraphElementTable {
        GraphElementTable::builder()
            .name(name)
            .base_table_name(name)
            .kind(ElementKind::Edge)
            .key_columns(vec!["id".to_string()])
            .source_node_table(GraphNodeTableReference::new(
                source,
                vec!["id".to_string()],
                vec!["src_id".to_string()],
            ))
            .target_node_table(GraphNodeTableReference::new(
                target,
                vec!["id".to_string()],
                vec!["dst_id".to_string()],
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn case_insensitive_collision_keeps_first_position_last_value() {
        let mut aliased = node("person").to_builder();
        aliased = aliased.key_columns(vec!["person_id".to_string()]);
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .add_node_table(node("City"))
            .add_node_table(aliased.build().unwrap())
            .build()
            .unwrap();
        assert_eq!(graph.node_tables().len(), 2);
        assert_eq!(graph.node_tables()[0].element_name(), "person");
        assert_eq!(graph.node_tables()[0].key_columns(), ["person_id"]);
        assert_eq!(graph.node_tables()[1].element_name(), "City");
    }

    #[test]
    fn namespaces_are_independent() {
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .add_edge_table(edge("Person_Knows", "Person", "Person"))
            .add_property_declaration(PropertyDeclaration::new("person", "STRING(MAX)"))
            .add_label(GraphElementLabel::new("person", vec!["name".to_string()]))
            .build()
            .unwrap();
        assert_eq!(graph.node_tables().len(), 1);
        assert_eq!(graph.edge_tables().len(), 1);
        assert_eq!(graph.property_declarations().len(), 1);
        assert_eq!(graph.labels().len(), 1);
    }

    #[test]
    fn build_rejects_kind_mismatch() {
        let err = PropertyGraph::builder()
            .name("G")
            .add_node_table(edge("Knows", "Person", "Person"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GraphDdlError::KindMismatch {
                table: "Knows".to_string(),
                expected: "node",
                actual: "EDGE".to_string(),
            }
        );
    }

    #[test]
    fn build_rejects_dangling_edge_reference() {
        let err = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .add_edge_table(edge("Knows", "Person", "Company"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GraphDdlError::UnknownNodeReference {
                edge_table: "Knows".to_string(),
                endpoint: "destination",
                node_table: "Company".to_string(),
            }
        );
    }

    #[test]
    fn edge_reference_resolution_is_case_insensitive() {
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .add_edge_table(edge("Knows", "PERSON", "person"))
            .build();
        assert!(graph.is_ok());
    }

    #[test]
    fn build_rejects_mixed_dialects() {
        let foreign = GraphElementTable::builder_with_dialect(Dialect::Postgresql)
            .base_table_name("Person")
            .kind(ElementKind::Node)
            .key_columns(vec!["id".to_string()])
            .build()
            .unwrap();
        let err = PropertyGraph::builder()
            .name("G")
            .add_node_table(foreign)
            .build()
            .unwrap_err();
        assert!(matches!(err, GraphDdlError::DialectMixture { .. }));
    }

    #[test]
    fn printing_unnamed_graph_fails() {
        let graph = PropertyGraph::builder().build().unwrap();
        assert_eq!(
            graph.pretty_print().unwrap_err(),
            GraphDdlError::MissingRequiredField {
                object: "property graph".to_string(),
                field: "name",
            }
        );
    }

    #[test]
    fn unsupported_dialect_builds_but_fails_printing() {
        let graph = PropertyGraph::builder_with_dialect(Dialect::Postgresql)
            .name("G")
            .build()
            .unwrap();
        assert_eq!(
            graph.pretty_print().unwrap_err(),
            GraphDdlError::DialectMismatch {
                dialect: Dialect::Postgresql
            }
        );
    }

    #[test]
    fn empty_graph_prints_empty_table_blocks() {
        let graph = PropertyGraph::builder().name("G").build().unwrap();
        assert_eq!(
            graph.pretty_print().unwrap(),
            "CREATE PROPERTY GRAPH G\nNODE TABLES(\n)\nEDGE TABLES(\n);"
        );
    }

    #[test]
    fn graph_level_declarations_are_stored_but_not_printed() {
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .add_property_declaration(PropertyDeclaration::new("name", "STRING(MAX)"))
            .add_label(GraphElementLabel::new("Person", vec!["name".to_string()]))
            .build()
            .unwrap();
        let ddl = graph.pretty_print().unwrap();
        assert!(!ddl.contains("STRING(MAX)"));
        assert_eq!(graph.property_declarations()[0].property_type, "STRING(MAX)");
    }

    #[test]
    fn to_builder_copy_and_rebuild_adds_tables() {
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(node("Person"))
            .build()
            .unwrap();
        let extended = graph
            .to_builder()
            .add_node_table(node("City"))
            .build()
            .unwrap();
        assert_eq!(graph.node_tables().len(), 1);
        assert_eq!(extended.node_tables().len(), 2);
        assert_eq!(extended.name(), "G");
    }

    #[test]
    fn labels_with_properties_survive_round_trip_through_builder() {
        let table = GraphElementTable::builder()
            .name("Person")
            .base_table_name("Person")
            .kind(ElementKind::Node)
            .key_columns(vec!["id".to_string()])
            .add_label(LabelToPropertyDefinitions::new(
                "Person",
                vec![PropertyDefinition::column("name")],
            ))
            .build()
            .unwrap();
        let graph = PropertyGraph::builder()
            .name("G")
            .add_node_table(table)
            .build()
            .unwrap();
        let rebuilt = graph.to_builder().build().unwrap();
        assert_eq!(graph, rebuilt);
    }
}
