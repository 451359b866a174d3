//! Gremlin Server WebSocket client
//!
//! Each submitted script opens its own connection and sends one `eval`
//! request. The server streams the result back in frames: status 206 while
//! more frames follow, 200 on the last one, 204 when there is nothing to
//! return. [`GremlinCursor`] reads a frame only when the records of the
//! previous one are used up, so at most one frame is buffered.
//!
//! Requests are sent as binary frames prefixed with `application/json`, the
//! mime type of the untyped GraphSON 1.0 serializer. Typed GraphSON
//! (`application/vnd.gremlin-v1.0+json` and later) would wrap every value in
//! `@class` / type tags the projector does not read.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use super::{GraphStore, ResultCursor, StoreError};
use crate::config::ReaderConfig;

const UNTYPED_GRAPHSON: &str = "application/json";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone)]
pub struct GremlinClient {
    endpoint: String,
    request_timeout: Duration,
}

impl GremlinClient {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Self {
        GremlinClient {
            endpoint: endpoint.into(),
            request_timeout,
        }
    }

    pub fn from_config(config: &ReaderConfig) -> Self {
        Self::new(config.endpoint(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect(&self) -> Result<Socket, StoreError> {
        let (socket, _) = tokio::time::timeout(self.request_timeout, connect_async(self.endpoint.as_str()))
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout.as_millis() as u64))?
            .map_err(|e| StoreError::Connection {
                endpoint: self.endpoint.clone(),
                message: e.to_string(),
            })?;
        Ok(socket)
    }

    /// Connect and send one `eval` request for `script`
    async fn open(&self, script: &str) -> Result<GremlinCursor, StoreError> {
        let mut socket = self.connect().await?;
        let request_id = uuid::Uuid::new_v4().to_string();
        log::debug!("Submitting gremlin request {}: {}", request_id, script);

        socket
            .send(Message::Binary(encode_request(&request_id, script)?))
            .await?;

        Ok(GremlinCursor {
            socket,
            buffered: VecDeque::new(),
            finished: false,
            request_timeout: self.request_timeout,
        })
    }
}

#[async_trait]
impl GraphStore for GremlinClient {
    async fn submit(&self, script: &str) -> Result<Box<dyn ResultCursor>, StoreError> {
        Ok(Box::new(self.open(script).await?))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestMessage<'a> {
    request_id: &'a str,
    op: &'a str,
    processor: &'a str,
    args: RequestArgs<'a>,
}

#[derive(Serialize)]
struct RequestArgs<'a> {
    gremlin: &'a str,
    language: &'a str,
}

#[derive(Deserialize)]
struct ResponseMessage {
    status: ResponseStatus,
    #[serde(default)]
    result: ResponseResult,
}

#[derive(Deserialize)]
struct ResponseStatus {
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Default)]
struct ResponseResult {
    #[serde(default)]
    data: Value,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Frame {
    /// More frames follow
    Partial(Vec<Value>),
    Final(Vec<Value>),
}

/// Mime-prefixed `eval` request: one length byte, the mime type, then JSON
pub(crate) fn encode_request(request_id: &str, script: &str) -> Result<Vec<u8>, StoreError> {
    let body = serde_json::to_vec(&RequestMessage {
        request_id,
        op: "eval",
        processor: "",
        args: RequestArgs {
            gremlin: script,
            language: "gremlin-groovy",
        },
    })?;

    let mut frame = Vec::with_capacity(1 + UNTYPED_GRAPHSON.len() + body.len());
    frame.push(UNTYPED_GRAPHSON.len() as u8);
    frame.extend_from_slice(UNTYPED_GRAPHSON.as_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub(crate) fn decode_response(text: &str) -> Result<Frame, StoreError> {
    let response: ResponseMessage = serde_json::from_str(text)?;
    let records = match response.result.data {
        Value::Null => Vec::new(),
        Value::Array(records) => records,
        other => vec![other],
    };

    match response.status.code {
        200 => Ok(Frame::Final(records)),
        204 => Ok(Frame::Final(Vec::new())),
        206 => Ok(Frame::Partial(records)),
        code => Err(StoreError::Remote {
            code,
            message: response.status.message,
        }),
    }
}

/// Cursor over one in-flight request
pub struct GremlinCursor {
    socket: Socket,
    buffered: VecDeque<Value>,
    finished: bool,
    request_timeout: Duration,
}

impl GremlinCursor {
    async fn read_frame(&mut self) -> Result<(), StoreError> {
        let message = tokio::time::timeout(self.request_timeout, self.socket.next())
            .await
            .map_err(|_| StoreError::Timeout(self.request_timeout.as_millis() as u64))?;

        let text = match message {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Binary(bytes))) => String::from_utf8(bytes)
                .map_err(|e| StoreError::MalformedResponse(e.to_string()))?,
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => return Ok(()),
            Some(Ok(Message::Close(_))) | None => {
                self.finished = true;
                return Err(StoreError::MalformedResponse(
                    "connection closed before the final response".to_string(),
                ));
            }
            Some(Err(e)) => {
                self.finished = true;
                return Err(e.into());
            }
        };
        log::trace!("Received gremlin frame: {} bytes", text.len());

        match decode_response(&text) {
            Ok(Frame::Partial(records)) => self.buffered.extend(records),
            Ok(Frame::Final(records)) => {
                self.buffered.extend(records);
                self.finished = true;
                if let Err(e) = self.socket.close(None).await {
                    log::debug!("Ignoring error while closing gremlin connection: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Gremlin request failed: {}", e);
                self.finished = true;
                return Err(e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResultCursor for GremlinCursor {
    async fn next(&mut self) -> Result<Option<Value>, StoreError> {
        loop {
            if let Some(record) = self.buffered.pop_front() {
                return Ok(Some(record));
            }
            if self.finished {
                return Ok(None);
            }
            self.read_frame().await?;
        }
    }
}
