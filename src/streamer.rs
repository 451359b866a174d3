//! Result streaming
//!
//! Drains a [`ResultCursor`] into a [`RowSink`] one record at a time:
//!
//! ```text
//! Idle -> Checking --running--> Pulling --record--> (write) -> Checking
//!            |                     |
//!            +--cancelled--> Stopped <--exhausted--+
//! ```
//!
//! Liveness is checked before every pull, so a cancelled query never pulls
//! another record. A pull already waiting on the store is not interrupted.
//! Each record results in exactly one `write_row` call; batching is left to
//! the sink.

use thiserror::Error;

use crate::projector::{RowProjector, SourceRecord};
use crate::sink::{RowSink, SinkError};
use crate::status::QueryStatus;
use crate::store::{ResultCursor, StoreError};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Records pulled from the cursor
    pub rows_pulled: u64,
    /// Rows the sink reported as materialized
    pub rows_written: u64,
    /// Stopped by the liveness check rather than by exhaustion
    pub cancelled: bool,
}

pub async fn stream(
    cursor: &mut dyn ResultCursor,
    projector: &RowProjector,
    sink: &mut dyn RowSink,
    status: &dyn QueryStatus,
) -> Result<StreamStats, StreamError> {
    let mut stats = StreamStats::default();

    loop {
        if !status.is_running() {
            stats.cancelled = true;
            break;
        }

        let Some(value) = cursor.next().await? else {
            break;
        };
        stats.rows_pulled += 1;

        let record = SourceRecord::from_value(projector.shape(), value);
        let written = sink.write_row(&mut || projector.project(&record))?;
        stats.rows_written += written as u64;
    }

    log::info!(
        "stream: numRows[{}] written[{}] cancelled[{}]",
        stats.rows_pulled,
        stats.rows_written,
        stats.cancelled
    );
    Ok(stats)
}
