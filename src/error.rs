//! Failure set for descriptor ingestion and generation planning.
//!
//! Everything here happens before any artifact is written. Generated code
//! and the `rt` primitives it calls have no error paths at all.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("failed to read descriptor file: {0}")]
    Io(#[from] std::io::Error),

    #[error("descriptor parse error {0}")]
    Parse(String),

    #[error("unsupported descriptor version {0} (expected 1)")]
    Version(u32),

    #[error("unsupported descriptor feature {0:?}")]
    UnsupportedFeature(String),

    #[error("invalid identifier {0:?}")]
    BadIdentifier(String),

    #[error("duplicate message name {0:?}")]
    DuplicateMessage(String),

    #[error("duplicate field name {field:?} in message {message}")]
    DuplicateField { message: String, field: String },

    #[error("duplicate tag {tag} in message {message}")]
    DuplicateTag { message: String, tag: u32 },

    #[error("field tag out of range: {message}.{field}")]
    InvalidTag { message: String, field: String },

    #[error("{message}.{field} is both repeated and optional")]
    RepeatedOptional { message: String, field: String },

    #[error("unknown message type {referenced:?} referenced by {message}.{field}")]
    UnknownType {
        message: String,
        field: String,
        referenced: String,
    },

    #[error("cyclic type expansion: {}", path.join(" -> "))]
    CyclicType { path: Vec<String> },

    #[error("capacity parameter {name} derived from both {first} and {second}")]
    ParamCollision {
        name: String,
        first: String,
        second: String,
    },
}
