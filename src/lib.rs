//! gremlin-reader - partition reads over property-graph tables
//!
//! This crate turns a "read this table partition" request into a Gremlin
//! query and streams the results into a row sink:
//! - Dispatch on the table's `componenttype` (vertex, edge or view)
//! - Vertex/edge scan traversals and verbatim view queries
//! - Per-field row projection resolved once per request
//! - Record-at-a-time streaming with cooperative cancellation
//!
//! ```ignore
//! let store = Arc::new(GremlinClient::from_config(&config));
//! let dispatcher = RequestDispatcher::from_config(store, &config);
//! let mut sink = BlockSink::from_config(&config);
//! let summary = dispatcher
//!     .execute_query(&request, &flag, &mut sink, &options)
//!     .await?;
//! ```

pub mod config;
pub mod dispatch;
pub mod projector;
pub mod request;
pub mod sink;
pub mod status;
pub mod store;
pub mod streamer;
pub mod traversal;

pub use config::ReaderConfig;
pub use dispatch::{ReadError, ReadSummary, RequestDispatcher};
pub use request::{Field, FieldType, QueryKind, ReadRequest, TableName, TableSchema};
pub use sink::{BlockSink, Row, RowSink};
pub use status::{CancellationFlag, QueryStatus};
pub use store::{GraphStore, GremlinClient, MemoryGraph, ResultCursor};
