//! Row projection
//!
//! A [`RowProjector`] resolves one extraction rule per requested field when
//! it is built, before any record is pulled, and then turns each
//! [`SourceRecord`] into a [`Row`]. The rule set depends on the record shape:
//!
//! - **Vertex value maps**: `id`/`label` read the element tokens; properties
//!   are list-valued and unwrapped to their first value.
//! - **Edge element maps**: `id`/`label`, plus `in`/`out` reading the endpoint
//!   vertex ids from the `IN`/`OUT` entries; properties are plain values.
//! - **View results**: objects are read by exact field name; a scalar result
//!   fills the only requested field.
//!
//! A field missing from a record (or one that cannot be read) becomes
//! `null`; it never drops the row. Records of the wrong shape are skipped.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::request::{Field, FieldType, QueryKind};
use crate::sink::Row;

/// Configuration option toggling case-insensitive field matching for
/// vertex and edge tables. Defaults to enabled.
pub const CASE_INSENSITIVE_MATCH_OPTION: &str = "enable_caseinsensitivematch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    VertexValueMap,
    EdgeElementMap,
    ViewResult,
}

impl From<QueryKind> for RecordShape {
    fn from(kind: QueryKind) -> Self {
        match kind {
            QueryKind::Vertex => RecordShape::VertexValueMap,
            QueryKind::Edge => RecordShape::EdgeElementMap,
            QueryKind::View => RecordShape::ViewResult,
        }
    }
}

/// One record pulled from a store cursor
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    PropertyMap(Map<String, Value>),
    Generic(Value),
}

impl SourceRecord {
    /// Wrap a raw cursor value. Vertex and edge results are property maps
    /// when they are objects; view results always stay generic.
    pub fn from_value(shape: RecordShape, value: Value) -> Self {
        match (shape, value) {
            (RecordShape::ViewResult, value) => SourceRecord::Generic(value),
            (_, Value::Object(map)) => SourceRecord::PropertyMap(map),
            (_, value) => SourceRecord::Generic(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectorOptions {
    pub case_insensitive: bool,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        ProjectorOptions {
            case_insensitive: true,
        }
    }
}

impl ProjectorOptions {
    /// Read recognized keys from pass-through configuration options.
    /// Anything but a literal `false` keeps the default.
    pub fn from_config_options(options: &HashMap<String, String>) -> Self {
        let case_insensitive = options
            .get(CASE_INSENSITIVE_MATCH_OPTION)
            .map(|value| !value.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        ProjectorOptions { case_insensitive }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Id,
    Label,
}

impl Token {
    fn key(&self) -> &'static str {
        match self {
            Token::Id => "id",
            Token::Label => "label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

impl Direction {
    fn key(&self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Extract {
    Token(Token),
    /// Id of an edge's endpoint vertex
    Endpoint(Direction),
    Property {
        key: String,
        case_insensitive: bool,
        unwrap_list: bool,
    },
    ViewColumn {
        key: String,
        unwrap_list: bool,
    },
}

#[derive(Debug, Clone)]
struct Rule {
    field: String,
    extract: Extract,
}

#[derive(Debug, Clone)]
pub struct RowProjector {
    shape: RecordShape,
    rules: Vec<Rule>,
}

impl RowProjector {
    pub fn build(fields: &[Field], shape: RecordShape, options: ProjectorOptions) -> Self {
        let rules = fields
            .iter()
            .map(|field| Rule {
                field: field.name.clone(),
                extract: resolve_rule(field, shape, options),
            })
            .collect();
        RowProjector { shape, rules }
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    /// Build one row, or `None` when the record does not fit this projector
    pub fn project(&self, record: &SourceRecord) -> Option<Row> {
        match (self.shape, record) {
            (RecordShape::ViewResult, record) => self.project_view(record),
            (_, SourceRecord::PropertyMap(map)) => Some(self.project_map(map)),
            (_, SourceRecord::Generic(_)) => None,
        }
    }

    fn project_map(&self, map: &Map<String, Value>) -> Row {
        let mut row = Row::with_capacity(self.rules.len());
        for rule in &self.rules {
            let value = match &rule.extract {
                Extract::Token(token) => map.get(token.key()).cloned(),
                Extract::Endpoint(direction) => map
                    .get(direction.key())
                    .and_then(|endpoint| endpoint.get(Token::Id.key()))
                    .cloned(),
                Extract::Property {
                    key,
                    case_insensitive,
                    unwrap_list,
                } => lookup(map, key, *case_insensitive).map(|value| {
                    if *unwrap_list {
                        first_value(value)
                    } else {
                        value.clone()
                    }
                }),
                Extract::ViewColumn { key, unwrap_list } => {
                    lookup(map, key, false).map(|value| {
                        if *unwrap_list {
                            first_value(value)
                        } else {
                            value.clone()
                        }
                    })
                }
            };
            row.push(rule.field.clone(), value.unwrap_or(Value::Null));
        }
        row
    }

    fn project_view(&self, record: &SourceRecord) -> Option<Row> {
        let value = match record {
            SourceRecord::PropertyMap(map) => return Some(self.project_map(map)),
            SourceRecord::Generic(value) => value,
        };

        // A list result stands for its first element
        let value = match value {
            Value::Array(items) => items.first()?,
            other => other,
        };

        match value {
            Value::Null => None,
            Value::Object(map) => Some(self.project_map(map)),
            scalar if self.rules.len() == 1 => {
                let mut row = Row::with_capacity(1);
                row.push(self.rules[0].field.clone(), scalar.clone());
                Some(row)
            }
            scalar => {
                log::debug!(
                    "Skipping scalar view result {} for {} requested fields",
                    scalar,
                    self.rules.len()
                );
                None
            }
        }
    }
}

fn resolve_rule(field: &Field, shape: RecordShape, options: ProjectorOptions) -> Extract {
    let unwrap_list = field.field_type != FieldType::List;
    let pseudo = field.name.to_ascii_lowercase();

    match shape {
        RecordShape::ViewResult => Extract::ViewColumn {
            key: field.name.clone(),
            unwrap_list,
        },
        RecordShape::VertexValueMap | RecordShape::EdgeElementMap => {
            match (shape, pseudo.as_str()) {
                (_, "id") => Extract::Token(Token::Id),
                (_, "label") => Extract::Token(Token::Label),
                (RecordShape::EdgeElementMap, "in") => Extract::Endpoint(Direction::In),
                (RecordShape::EdgeElementMap, "out") => Extract::Endpoint(Direction::Out),
                _ => Extract::Property {
                    key: field.name.clone(),
                    case_insensitive: options.case_insensitive,
                    // Only vertex value maps wrap properties in lists
                    unwrap_list: unwrap_list && shape == RecordShape::VertexValueMap,
                },
            }
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str, case_insensitive: bool) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        if case_insensitive {
            map.iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        } else {
            None
        }
    })
}

fn first_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}
