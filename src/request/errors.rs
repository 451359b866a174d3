use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("Table schema has no `{key}` metadata")]
    MissingMetadata { key: &'static str },

    #[error("Unrecognized component type `{value}`; expected vertex, edge or view")]
    UnrecognizedQueryKind { value: String },
}
