//! Row output
//!
//! A [`RowSink`] receives candidate rows one call at a time and owns every
//! decision about how rows are grouped into blocks. [`BlockSink`] is the
//! in-memory implementation: it numbers rows sequentially and seals a
//! [`Block`] whenever it reaches `max_block_rows`.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ReaderConfig;

#[derive(Debug, Error, PartialEq)]
pub enum SinkError {
    #[error("Sink is closed; row {row_number} was not written")]
    Closed { row_number: u64 },

    #[error("Sink rejected row {row_number}: {reason}")]
    Rejected { row_number: u64, reason: String },
}

/// One output row: a value per requested field, in field order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.values.push((field.into(), value));
    }

    /// Value of `field`; `None` only when the field was not requested
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }
}

pub trait RowSink: Send {
    /// Offer one candidate row. `producer` builds it, returning `None` when
    /// the candidate is skipped. Returns the number of rows written (0 or 1).
    fn write_row(&mut self, producer: &mut dyn FnMut() -> Option<Row>) -> Result<usize, SinkError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Sequence number of the first row in this block
    pub first_row: u64,
    pub rows: Vec<Row>,
}

impl Block {
    fn starting_at(first_row: u64) -> Self {
        Block {
            first_row,
            rows: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct BlockSink {
    max_block_rows: usize,
    current: Block,
    sealed: Vec<Block>,
    rows_written: u64,
    candidates: u64,
    closed: bool,
}

impl BlockSink {
    pub fn new(max_block_rows: usize) -> Self {
        BlockSink {
            max_block_rows: max_block_rows.max(1),
            current: Block::starting_at(0),
            sealed: Vec::new(),
            rows_written: 0,
            candidates: 0,
            closed: false,
        }
    }

    pub fn from_config(config: &ReaderConfig) -> Self {
        Self::new(config.max_block_rows)
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Candidate rows offered, including skipped ones
    pub fn candidates(&self) -> u64 {
        self.candidates
    }

    pub fn sealed_blocks(&self) -> &[Block] {
        &self.sealed
    }

    /// All written rows in order, sealed or not
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sealed
            .iter()
            .chain(std::iter::once(&self.current))
            .flat_map(|block| block.rows.iter())
    }

    /// Seal the partial block and refuse further writes
    pub fn close(&mut self) {
        self.seal();
        self.closed = true;
    }

    pub fn into_blocks(mut self) -> Vec<Block> {
        self.seal();
        self.sealed
    }

    fn seal(&mut self) {
        if self.current.rows.is_empty() {
            return;
        }
        let next = Block::starting_at(self.rows_written);
        let full = std::mem::replace(&mut self.current, next);
        log::debug!(
            "Sealed block of {} rows starting at row {}",
            full.rows.len(),
            full.first_row
        );
        self.sealed.push(full);
    }
}

impl RowSink for BlockSink {
    fn write_row(&mut self, producer: &mut dyn FnMut() -> Option<Row>) -> Result<usize, SinkError> {
        if self.closed {
            return Err(SinkError::Closed {
                row_number: self.rows_written,
            });
        }
        self.candidates += 1;

        let Some(row) = producer() else {
            return Ok(0);
        };
        self.current.rows.push(row);
        self.rows_written += 1;

        if self.current.rows.len() >= self.max_block_rows {
            self.seal();
        }
        Ok(1)
    }
}
