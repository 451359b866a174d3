//! In-process property graph
//!
//! Evaluates [`Traversal`] steps directly against vertices and edges held in
//! memory and answers literal scripts registered with
//! [`MemoryGraph::register_query`]. Result shapes follow the GraphSON v1
//! conventions the Gremlin client returns:
//!
//! ```text
//! valueMap().with(WithOptions.tokens)
//!   {"id": 1, "label": "person", "name": ["marko"], "age": [29]}
//! elementMap() on an edge
//!   {"id": 7, "label": "knows", "IN": {"id": 2, "label": "person"},
//!    "OUT": {"id": 1, "label": "person"}, "weight": 0.5}
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{GraphStore, ResultCursor, StoreError, VecCursor};
use crate::traversal::{Step, Traversal};

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: Value,
    pub label: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Value,
    pub label: String,
    pub out_vertex: Value,
    pub in_vertex: Value,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Copy)]
enum Element<'a> {
    Vertex(&'a Vertex),
    Edge(&'a Edge),
}

impl Element<'_> {
    fn label(&self) -> &str {
        match self {
            Element::Vertex(v) => &v.label,
            Element::Edge(e) => &e.label,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    queries: HashMap<String, Vec<Value>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex; `properties` must be a JSON object, anything else adds none
    pub fn add_vertex(
        &mut self,
        id: impl Into<Value>,
        label: impl Into<String>,
        properties: Value,
    ) -> &mut Self {
        self.vertices.push(Vertex {
            id: id.into(),
            label: label.into(),
            properties: into_object(properties),
        });
        self
    }

    /// Add an edge from `out_vertex` to `in_vertex`
    pub fn add_edge(
        &mut self,
        id: impl Into<Value>,
        label: impl Into<String>,
        out_vertex: impl Into<Value>,
        in_vertex: impl Into<Value>,
        properties: Value,
    ) -> &mut Self {
        self.edges.push(Edge {
            id: id.into(),
            label: label.into(),
            out_vertex: out_vertex.into(),
            in_vertex: in_vertex.into(),
            properties: into_object(properties),
        });
        self
    }

    /// Answer `script` with `results` whenever it is submitted
    pub fn register_query(&mut self, script: impl Into<String>, results: Vec<Value>) -> &mut Self {
        let script: String = script.into();
        self.queries.insert(script.trim().to_string(), results);
        self
    }

    /// Evaluate steps in order. Without a projection step, elements come
    /// back as element maps.
    pub fn evaluate(&self, traversal: &Traversal) -> Result<Vec<Value>, StoreError> {
        let mut elements: Vec<Element<'_>> = Vec::new();
        let mut projected: Option<Vec<Value>> = None;

        for step in traversal.steps() {
            if projected.is_some() {
                return Err(StoreError::UnsupportedQuery(format!(
                    "step {:?} after a projection in {}",
                    step, traversal
                )));
            }
            match step {
                Step::V => elements = self.vertices.iter().map(Element::Vertex).collect(),
                Step::E => elements = self.edges.iter().map(Element::Edge).collect(),
                Step::HasLabel(label) => elements.retain(|element| element.label() == label.as_str()),
                Step::ValueMap { tokens } => {
                    projected = Some(
                        elements
                            .iter()
                            .map(|element| self.value_map(*element, *tokens))
                            .collect(),
                    )
                }
                Step::ElementMap => {
                    projected = Some(
                        elements
                            .iter()
                            .map(|element| self.element_map(*element))
                            .collect(),
                    )
                }
            }
        }

        Ok(projected.unwrap_or_else(|| {
            elements
                .iter()
                .map(|element| self.element_map(*element))
                .collect()
        }))
    }

    fn value_map(&self, element: Element<'_>, tokens: bool) -> Value {
        let mut map = Map::new();
        let (id, label, properties, multi_valued) = match element {
            Element::Vertex(v) => (&v.id, &v.label, &v.properties, true),
            Element::Edge(e) => (&e.id, &e.label, &e.properties, false),
        };
        if tokens {
            map.insert("id".to_string(), id.clone());
            map.insert("label".to_string(), Value::String(label.clone()));
        }
        for (key, value) in properties {
            // Vertex properties have list cardinality in a value map
            let value = match value {
                Value::Array(_) => value.clone(),
                _ if multi_valued => Value::Array(vec![value.clone()]),
                _ => value.clone(),
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }

    fn element_map(&self, element: Element<'_>) -> Value {
        let mut map = Map::new();
        match element {
            Element::Vertex(v) => {
                map.insert("id".to_string(), v.id.clone());
                map.insert("label".to_string(), Value::String(v.label.clone()));
                for (key, value) in &v.properties {
                    // elementMap keeps only the first value of a multi-property
                    let value = match value {
                        Value::Array(values) => values.first().cloned().unwrap_or(Value::Null),
                        _ => value.clone(),
                    };
                    map.insert(key.clone(), value);
                }
            }
            Element::Edge(e) => {
                map.insert("id".to_string(), e.id.clone());
                map.insert("label".to_string(), Value::String(e.label.clone()));
                map.insert("IN".to_string(), self.endpoint(&e.in_vertex));
                map.insert("OUT".to_string(), self.endpoint(&e.out_vertex));
                for (key, value) in &e.properties {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Object(map)
    }

    fn endpoint(&self, vertex_id: &Value) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), vertex_id.clone());
        if let Some(vertex) = self.vertices.iter().find(|v| &v.id == vertex_id) {
            map.insert("label".to_string(), Value::String(vertex.label.clone()));
        }
        Value::Object(map)
    }
}

fn into_object(properties: Value) -> Map<String, Value> {
    match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn submit(&self, script: &str) -> Result<Box<dyn ResultCursor>, StoreError> {
        let results = self
            .queries
            .get(script.trim())
            .cloned()
            .ok_or_else(|| StoreError::UnsupportedQuery(script.to_string()))?;
        Ok(Box::new(VecCursor::from(results)))
    }

    async fn traverse(&self, traversal: &Traversal) -> Result<Box<dyn ResultCursor>, StoreError> {
        log::debug!("MemoryGraph evaluating {}", traversal);
        Ok(Box::new(VecCursor::from(self.evaluate(traversal)?)))
    }
}
