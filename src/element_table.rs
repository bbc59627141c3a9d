//! One relational table mapped into a property graph as a node or an edge.
//!
//! A [`GraphElementTable`] is a leaf of the schema model: it names the
//! underlying table, its key columns, the labels it exposes (each with an
//! ordered list of property definitions), and, for edges, the source and
//! destination node table references. Instances are produced only by
//! [`GraphElementTableBuilder`], which runs all structural validation once at
//! `build()` time; the built value is immutable and prints itself as a DDL
//! fragment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::dialect::Dialect;
use crate::errors::GraphDdlError;

/// Role of an element table within the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElementKind {
    #[default]
    Unspecified,
    Node,
    Edge,
}

impl ElementKind {
    fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Unspecified => "UNSPECIFIED",
            ElementKind::Node => "NODE",
            ElementKind::Edge => "EDGE",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single property projection: the graph-visible property name and the SQL
/// value expression that produces it. When the two are textually equal the
/// property is a bare projected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub property_name: String,
    pub value_expression: String,
}

impl PropertyDefinition {
    pub fn new(property_name: impl Into<String>, value_expression: impl Into<String>) -> Self {
        PropertyDefinition {
            property_name: property_name.into(),
            value_expression: value_expression.into(),
        }
    }

    /// A bare projected column: property name and value expression coincide.
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        PropertyDefinition {
            value_expression: name.clone(),
            property_name: name,
        }
    }
}

/// A label exposed by an element table, with its ordered property definitions.
///
/// An empty definition list is meaningful: it prints as `NO PROPERTIES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelToPropertyDefinitions {
    pub label_name: String,
    pub property_definitions: Vec<PropertyDefinition>,
}

impl LabelToPropertyDefinitions {
    pub fn new(
        label_name: impl Into<String>,
        property_definitions: Vec<PropertyDefinition>,
    ) -> Self {
        LabelToPropertyDefinitions {
            label_name: label_name.into(),
            property_definitions,
        }
    }

    fn write_ddl(&self, out: &mut String) {
        out.push_str("LABEL ");
        out.push_str(&self.label_name);
        if self.property_definitions.is_empty() {
            out.push_str(" NO PROPERTIES");
            return;
        }
        out.push_str(" PROPERTIES(");
        for (i, def) in self.property_definitions.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if def.value_expression == def.property_name {
                out.push_str(&def.property_name);
            } else {
                out.push_str(&def.value_expression);
                out.push_str(" AS ");
                out.push_str(&def.property_name);
            }
        }
        out.push(')');
    }
}

/// An edge endpoint: the referenced node table, that node's key columns, and
/// the edge table's matching key columns. The two column lists correspond
/// positionally and must be equal in length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNodeTableReference {
    pub node_table_name: String,
    pub node_key_columns: Vec<String>,
    pub edge_key_columns: Vec<String>,
}

impl GraphNodeTableReference {
    pub fn new(
        node_table_name: impl Into<String>,
        node_key_columns: Vec<String>,
        edge_key_columns: Vec<String>,
    ) -> Self {
        GraphNodeTableReference {
            node_table_name: node_table_name.into(),
            node_key_columns,
            edge_key_columns,
        }
    }

    // The printed key list is the edge's own columns, not the node's.
    fn write_ddl(&self, out: &mut String) {
        out.push_str("KEY(");
        out.push_str(&self.edge_key_columns.join(", "));
        out.push_str(") REFERENCES ");
        out.push_str(&self.node_table_name);
    }
}

/// One graph element (node or edge) backed by a relational table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphElementTable {
    name: String,
    base_table_name: String,
    kind: ElementKind,
    dialect: Dialect,
    key_columns: Vec<String>,
    labels: Vec<LabelToPropertyDefinitions>,
    source_node_table: Option<GraphNodeTableReference>,
    target_node_table: Option<GraphNodeTableReference>,
}

impl GraphElementTable {
    /// Builder under the default (supported) dialect.
    pub fn builder() -> GraphElementTableBuilder {
        Self::builder_with_dialect(Dialect::default())
    }

    pub fn builder_with_dialect(dialect: Dialect) -> GraphElementTableBuilder {
        GraphElementTableBuilder {
            name: String::new(),
            base_table_name: String::new(),
            kind: ElementKind::Unspecified,
            dialect,
            key_columns: Vec::new(),
            labels: Vec::new(),
            label_index: HashMap::new(),
            source_node_table: None,
            target_node_table: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_table_name(&self) -> &str {
        &self.base_table_name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn labels(&self) -> &[LabelToPropertyDefinitions] {
        &self.labels
    }

    pub fn source_node_table(&self) -> Option<&GraphNodeTableReference> {
        self.source_node_table.as_ref()
    }

    pub fn target_node_table(&self) -> Option<&GraphNodeTableReference> {
        self.target_node_table.as_ref()
    }

    /// The name this table is registered under in a graph: the display alias
    /// when present, otherwise the base table name.
    pub fn element_name(&self) -> &str {
        if self.name.is_empty() {
            &self.base_table_name
        } else {
            &self.name
        }
    }

    /// Seed a fresh builder with this table's current field values.
    pub fn to_builder(&self) -> GraphElementTableBuilder {
        let mut builder = Self::builder_with_dialect(self.dialect)
            .name(self.name.clone())
            .base_table_name(self.base_table_name.clone())
            .kind(self.kind)
            .key_columns(self.key_columns.clone());
        for label in &self.labels {
            builder = builder.add_label(label.clone());
        }
        if let Some(source) = &self.source_node_table {
            builder = builder.source_node_table(source.clone());
        }
        if let Some(target) = &self.target_node_table {
            builder = builder.target_node_table(target.clone());
        }
        builder
    }

    /// Render this table's DDL fragment.
    ///
    /// The fragment is fully buffered; on error nothing is returned to the
    /// caller. Printing never mutates state, so repeated calls yield
    /// identical text.
    ///
    /// # Errors
    ///
    /// [`GraphDdlError::DialectMismatch`] when the table was built under a
    /// dialect that cannot be printed.
    pub fn pretty_print(&self) -> Result<String, GraphDdlError> {
        let mut out = String::new();
        self.write_ddl(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write_ddl(&self, out: &mut String) -> Result<(), GraphDdlError> {
        if !self.dialect.supports_property_graph_ddl() {
            return Err(GraphDdlError::DialectMismatch {
                dialect: self.dialect,
            });
        }

        out.push_str(&self.base_table_name);
        if !self.name.is_empty() && self.name != self.base_table_name {
            out.push_str(" AS ");
            out.push_str(&self.name);
        }
        out.push_str("\n KEY (");
        out.push_str(&self.key_columns.join(", "));
        out.push_str(")\n");

        if self.kind == ElementKind::Edge {
            // build() guarantees both endpoints for edges.
            let (source, target) = match (&self.source_node_table, &self.target_node_table) {
                (Some(source), Some(target)) => (source, target),
                (None, _) => {
                    return Err(GraphDdlError::MissingEndpoint {
                        table: self.element_name().to_string(),
                        endpoint: "source",
                    })
                }
                (_, None) => {
                    return Err(GraphDdlError::MissingEndpoint {
                        table: self.element_name().to_string(),
                        endpoint: "destination",
                    })
                }
            };
            out.push_str("SOURCE ");
            source.write_ddl(out);
            out.push_str(" DESTINATION ");
            target.write_ddl(out);
            out.push('\n');
        }

        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            label.write_ddl(out);
        }
        Ok(())
    }
}

/// Accumulates the fields of a [`GraphElementTable`] and validates them once
/// in [`build`](GraphElementTableBuilder::build). Consumed by `build`; a built
/// table is modified by going back through
/// [`GraphElementTable::to_builder`].
#[derive(Debug, Clone)]
pub struct GraphElementTableBuilder {
    name: String,
    base_table_name: String,
    kind: ElementKind,
    dialect: Dialect,
    key_columns: Vec<String>,
    labels: Vec<LabelToPropertyDefinitions>,
    label_index: HashMap<String, usize>,
    source_node_table: Option<GraphNodeTableReference>,
    target_node_table: Option<GraphNodeTableReference>,
}

impl GraphElementTableBuilder {
    /// Display alias. Leave unset (empty) to print the base table name alone.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn base_table_name(mut self, base_table_name: impl Into<String>) -> Self {
        self.base_table_name = base_table_name.into();
        self
    }

    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn key_columns(mut self, key_columns: Vec<String>) -> Self {
        self.key_columns = key_columns;
        self
    }

    /// Register a label. Label names are case-insensitively unique within one
    /// element table: re-adding an existing label replaces its definitions in
    /// place, keeping the first insertion's position.
    pub fn add_label(mut self, label: LabelToPropertyDefinitions) -> Self {
        let key = label.label_name.to_lowercase();
        match self.label_index.get(&key) {
            Some(&position) => {
                log::debug!(
                    "label '{}' redefined on element table '{}' (replacing earlier definition)",
                    label.label_name,
                    self.base_table_name
                );
                self.labels[position] = label;
            }
            None => {
                self.label_index.insert(key, self.labels.len());
                self.labels.push(label);
            }
        }
        self
    }

    pub fn source_node_table(mut self, reference: GraphNodeTableReference) -> Self {
        self.source_node_table = Some(reference);
        self
    }

    pub fn target_node_table(mut self, reference: GraphNodeTableReference) -> Self {
        self.target_node_table = Some(reference);
        self
    }

    /// Validate and freeze the element table.
    ///
    /// # Errors
    ///
    /// - [`GraphDdlError::MissingRequiredField`] - empty base table name
    /// - [`GraphDdlError::EmptyKeyColumns`] - no key columns
    /// - [`GraphDdlError::MissingEndpoint`] - EDGE without both references
    /// - [`GraphDdlError::UnexpectedEndpoint`] - non-EDGE with a reference
    /// - [`GraphDdlError::KeyColumnCountMismatch`] - a reference whose node
    ///   and edge key column lists differ in length
    pub fn build(self) -> Result<GraphElementTable, GraphDdlError> {
        if self.base_table_name.is_empty() {
            let object = if self.name.is_empty() {
                "element table".to_string()
            } else {
                format!("element table '{}'", self.name)
            };
            return Err(GraphDdlError::MissingRequiredField {
                object,
                field: "base_table_name",
            });
        }
        let display_name = if self.name.is_empty() {
            &self.base_table_name
        } else {
            &self.name
        };
        if self.key_columns.is_empty() {
            return Err(GraphDdlError::EmptyKeyColumns {
                table: display_name.clone(),
            });
        }

        match self.kind {
            ElementKind::Edge => {
                for (reference, endpoint) in [
                    (&self.source_node_table, "source"),
                    (&self.target_node_table, "destination"),
                ] {
                    let reference =
                        reference
                            .as_ref()
                            .ok_or_else(|| GraphDdlError::MissingEndpoint {
                                table: display_name.clone(),
                                endpoint,
                            })?;
                    if reference.node_key_columns.len() != reference.edge_key_columns.len() {
                        return Err(GraphDdlError::KeyColumnCountMismatch {
                            table: display_name.clone(),
                            endpoint,
                            node_table: reference.node_table_name.clone(),
                            edge_count: reference.edge_key_columns.len(),
                            node_count: reference.node_key_columns.len(),
                        });
                    }
                }
            }
            ElementKind::Node | ElementKind::Unspecified => {
                for (reference, endpoint) in [
                    (&self.source_node_table, "source"),
                    (&self.target_node_table, "destination"),
                ] {
                    if reference.is_some() {
                        return Err(GraphDdlError::UnexpectedEndpoint {
                            kind: self.kind.as_str(),
                            table: display_name.clone(),
                            endpoint,
                        });
                    }
                }
            }
        }

        log::debug!(
            "built {} element table '{}' over '{}' ({} key column(s), {} label(s))",
            self.kind,
            display_name,
            self.base_table_name,
            self.key_columns.len(),
            self.labels.len()
        );
        Ok(GraphElementTable {
            name: self.name,
            base_table_name: self.base_table_name,
            kind: self.kind,
            dialect: self.dialect,
            key_columns: self.key_columns,
            labels: self.labels,
            source_node_table: self.source_node_table,
            target_node_table: self.target_node_table,
        })
    }
}
