//! Remote graph-store boundary
//!
//! The reader talks to a store only through [`GraphStore`], which turns a
//! traversal or a literal script into a forward-only [`ResultCursor`]. Records
//! are untyped JSON values; interpreting them is the projector's job.
//!
//! Implementations:
//! - [`gremlin_client::GremlinClient`]: Gremlin Server over WebSocket
//! - [`memory::MemoryGraph`]: in-process graph, for embedding and tests

pub mod errors;
pub mod gremlin_client;
pub mod memory;

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;

use crate::traversal::Traversal;

pub use errors::StoreError;
pub use gremlin_client::GremlinClient;
pub use memory::MemoryGraph;

/// Pull-based, forward-only handle over one query's results
#[async_trait]
pub trait ResultCursor: Send {
    /// Next record, or `None` once the result is exhausted
    async fn next(&mut self) -> Result<Option<Value>, StoreError>;
}

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Submit script text verbatim
    async fn submit(&self, script: &str) -> Result<Box<dyn ResultCursor>, StoreError>;

    /// Run a traversal; stores without native step evaluation submit its script form
    async fn traverse(&self, traversal: &Traversal) -> Result<Box<dyn ResultCursor>, StoreError> {
        self.submit(&traversal.to_gremlin()).await
    }
}

/// Cursor over records already held in memory
#[derive(Debug, Default)]
pub struct VecCursor {
    records: VecDeque<Value>,
}

impl From<Vec<Value>> for VecCursor {
    fn from(records: Vec<Value>) -> Self {
        VecCursor {
            records: records.into(),
        }
    }
}

#[async_trait]
impl ResultCursor for VecCursor {
    async fn next(&mut self) -> Result<Option<Value>, StoreError> {
        Ok(self.records.pop_front())
    }
}
