use thiserror::Error;

use crate::request::RequestError;
use crate::sink::SinkError;
use crate::store::StoreError;
use crate::streamer::StreamError;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<StreamError> for ReadError {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::Store(e) => ReadError::Store(e),
            StreamError::Sink(e) => ReadError::Sink(e),
        }
    }
}
