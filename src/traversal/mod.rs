//! Gremlin traversal construction
//!
//! Table scans are built as a typed list of [`Step`]s so that stores able to
//! evaluate steps directly (see [`crate::store::memory`]) never go through
//! script text, while remote stores receive the rendered Gremlin.
//!
//! ```text
//! vertex_scan("Person") => g.V().hasLabel('Person').valueMap().with(WithOptions.tokens)
//! edge_scan("knows")    => g.E().hasLabel('knows').elementMap()
//! ```

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// All vertices
    V,
    /// All edges
    E,
    HasLabel(String),
    /// Property map; `tokens` adds the element's id and label
    ValueMap { tokens: bool },
    /// Properties plus id, label and, for edges, both endpoints
    ElementMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    steps: Vec<Step>,
}

impl Traversal {
    pub fn vertices() -> Self {
        Traversal {
            steps: vec![Step::V],
        }
    }

    pub fn edges() -> Self {
        Traversal {
            steps: vec![Step::E],
        }
    }

    pub fn has_label(mut self, label: impl Into<String>) -> Self {
        self.steps.push(Step::HasLabel(label.into()));
        self
    }

    pub fn value_map_with_tokens(mut self) -> Self {
        self.steps.push(Step::ValueMap { tokens: true });
        self
    }

    pub fn element_map(mut self) -> Self {
        self.steps.push(Step::ElementMap);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Render as Gremlin-Groovy script text
    pub fn to_gremlin(&self) -> String {
        let mut script = String::from("g");
        for step in &self.steps {
            match step {
                Step::V => script.push_str(".V()"),
                Step::E => script.push_str(".E()"),
                Step::HasLabel(label) => {
                    script.push_str(".hasLabel(");
                    script.push_str(&quote(label));
                    script.push(')');
                }
                Step::ValueMap { tokens: true } => {
                    script.push_str(".valueMap().with(WithOptions.tokens)")
                }
                Step::ValueMap { tokens: false } => script.push_str(".valueMap()"),
                Step::ElementMap => script.push_str(".elementMap()"),
            }
        }
        script
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gremlin())
    }
}

/// Vertices with exactly this label, as value maps including id/label tokens
pub fn vertex_scan(label: &str) -> Traversal {
    Traversal::vertices().has_label(label).value_map_with_tokens()
}

/// Edges with exactly this label, as element maps
pub fn edge_scan(label: &str) -> Traversal {
    Traversal::edges().has_label(label).element_map()
}

/// Single-quoted Groovy string literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
