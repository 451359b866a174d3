//! Read requests for property-graph tables
//!
//! A [`ReadRequest`] names one table partition, carries its [`TableSchema`]
//! (ordered fields plus the catalog's custom metadata) and the constraint
//! summary that downstream writers consume.
//!
//! # Recognized metadata
//!
//! | key             | meaning                                              |
//! |-----------------|------------------------------------------------------|
//! | `componenttype` | `vertex`, `edge` or `view` (case-insensitive)         |
//! | `glabel`        | store label, overrides the catalog's table name       |
//! | `query`         | literal query text, required for `view` tables        |
//!
//! Catalogs commonly lowercase table names, so `glabel` is how a table keeps
//! the store's real label casing.

pub mod errors;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use errors::RequestError;

pub const COMPONENT_TYPE_KEY: &str = "componenttype";
pub const LABEL_OVERRIDE_KEY: &str = "glabel";
pub const QUERY_KEY: &str = "query";

/// The query shape a table maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Vertex,
    Edge,
    View,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Vertex => "vertex",
            QueryKind::Edge => "edge",
            QueryKind::View => "view",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" => Ok(QueryKind::Vertex),
            "edge" => Ok(QueryKind::Edge),
            "view" => Ok(QueryKind::View),
            _ => Err(RequestError::UnrecognizedQueryKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Semantic type of an output column, carried for the downstream writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Utf8,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    Date,
    Timestamp,
    /// Multi-valued column; list values are kept whole instead of unwrapped
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered fields plus the catalog's custom metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<Field>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl TableSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        TableSchema {
            fields,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Parse the `componenttype` marker
    pub fn query_kind(&self) -> Result<QueryKind, RequestError> {
        self.metadata(COMPONENT_TYPE_KEY)
            .ok_or(RequestError::MissingMetadata {
                key: COMPONENT_TYPE_KEY,
            })?
            .parse()
    }

    /// The `glabel` override, ignoring blank values
    pub fn label_override(&self) -> Option<&str> {
        self.metadata(LABEL_OVERRIDE_KEY)
            .filter(|label| !label.trim().is_empty())
    }

    /// The literal query of a view table
    pub fn literal_query(&self) -> Result<&str, RequestError> {
        self.metadata(QUERY_KEY)
            .ok_or(RequestError::MissingMetadata { key: QUERY_KEY })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableName {
    pub schema_name: String,
    pub table_name: String,
}

impl TableName {
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        TableName {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema_name, self.table_name)
    }
}

/// One partition read against one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    #[serde(default = "new_query_id")]
    pub query_id: String,
    pub table_name: TableName,
    pub schema: TableSchema,
    /// Split identifier, used only for diagnostics here
    #[serde(default)]
    pub split_id: Option<String>,
    /// Constraint summary for downstream writers; not interpreted by the reader
    #[serde(default)]
    pub constraints: HashMap<String, serde_json::Value>,
}

fn new_query_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ReadRequest {
    pub fn new(table_name: TableName, schema: TableSchema) -> Self {
        ReadRequest {
            query_id: new_query_id(),
            table_name,
            schema,
            split_id: None,
            constraints: HashMap::new(),
        }
    }

    /// Label used against the store: `glabel` when set, else the table name
    pub fn effective_label(&self) -> &str {
        self.schema
            .label_override()
            .unwrap_or(&self.table_name.table_name)
    }
}
