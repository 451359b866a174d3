//! Request dispatch
//!
//! [`RequestDispatcher::execute_query`] is the entry point of a partition read:
//!
//! 1. Parse `componenttype` into a [`QueryKind`] once.
//! 2. Resolve the label (`glabel` over the table name).
//! 3. Open a cursor: a vertex or edge scan traversal, or the table's literal
//!    view query submitted verbatim.
//! 4. Build the row projector for the matching record shape.
//! 5. Stream the cursor into the sink, then drop the cursor.
//!
//! A missing or unknown `componenttype` runs nothing and reports an empty,
//! unhandled read. With `strict_query_kind` it fails the request instead.

pub mod errors;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ReaderConfig;
use crate::projector::{ProjectorOptions, RecordShape, RowProjector};
use crate::request::{QueryKind, ReadRequest};
use crate::sink::RowSink;
use crate::status::QueryStatus;
use crate::store::{GraphStore, ResultCursor, StoreError};
use crate::streamer::{self, StreamStats};
use crate::traversal;

pub use errors::ReadError;

/// Outcome of one partition read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// `None` when the request was left unhandled
    pub query_kind: Option<QueryKind>,
    pub stats: StreamStats,
}

impl ReadSummary {
    pub fn unhandled() -> Self {
        Self::default()
    }

    pub fn is_handled(&self) -> bool {
        self.query_kind.is_some()
    }

    pub fn rows_pulled(&self) -> u64 {
        self.stats.rows_pulled
    }

    pub fn rows_written(&self) -> u64 {
        self.stats.rows_written
    }
}

pub struct RequestDispatcher {
    store: Arc<dyn GraphStore>,
    strict_query_kind: bool,
}

impl RequestDispatcher {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        RequestDispatcher {
            store,
            strict_query_kind: false,
        }
    }

    pub fn from_config(store: Arc<dyn GraphStore>, config: &ReaderConfig) -> Self {
        Self::new(store).with_strict_query_kind(config.strict_query_kind)
    }

    pub fn with_strict_query_kind(mut self, strict: bool) -> Self {
        self.strict_query_kind = strict;
        self
    }

    /// Read one partition of `request`'s table into `sink`.
    ///
    /// `options` are pass-through configuration options; only vertex and edge
    /// projections read them.
    pub async fn execute_query(
        &self,
        request: &ReadRequest,
        status: &dyn QueryStatus,
        sink: &mut dyn RowSink,
        options: &HashMap<String, String>,
    ) -> Result<ReadSummary, ReadError> {
        log::debug!(
            "execute_query: enter - query {} table {} split {:?}",
            request.query_id,
            request.table_name,
            request.split_id
        );

        let kind = match request.schema.query_kind() {
            Ok(kind) => kind,
            Err(e) if !self.strict_query_kind => {
                log::warn!(
                    "execute_query: {} for table {}; no query executed",
                    e,
                    request.table_name
                );
                return Ok(ReadSummary::unhandled());
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!("execute_query: schema type is {}", kind);

        let mut cursor = match kind {
            QueryKind::Vertex => {
                let scan = traversal::vertex_scan(request.effective_label());
                self.store.traverse(&scan).await?
            }
            QueryKind::Edge => {
                let scan = traversal::edge_scan(request.effective_label());
                self.store.traverse(&scan).await?
            }
            QueryKind::View => {
                let query = request.schema.literal_query()?;
                run_view_query(self.store.as_ref(), query).await?
            }
        };

        let projector = RowProjector::build(
            &request.schema.fields,
            RecordShape::from(kind),
            ProjectorOptions::from_config_options(options),
        );

        let stats = streamer::stream(cursor.as_mut(), &projector, sink, status).await?;
        drop(cursor);

        Ok(ReadSummary {
            query_kind: Some(kind),
            stats,
        })
    }
}

/// Submit a view table's literal query verbatim
pub async fn run_view_query(
    store: &dyn GraphStore,
    query: &str,
) -> Result<Box<dyn ResultCursor>, StoreError> {
    log::debug!("run_view_query: {}", query);
    store.submit(query).await
}
