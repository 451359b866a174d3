use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to graph store at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    #[error("WebSocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Graph store returned status {code}: {message}")]
    Remote { code: u16, message: String },

    #[error("Malformed response from graph store: {0}")]
    MalformedResponse(String),

    #[error("Timed out after {0} ms waiting for graph store")]
    Timeout(u64),

    #[error("Query is not supported by this store: {0}")]
    UnsupportedQuery(String),

    #[error("Failed to encode or decode graph store message: {0}")]
    Json(#[from] serde_json::Error),
}
