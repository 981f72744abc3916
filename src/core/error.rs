use thiserror::Error;

use crate::core::types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("unsupported collection shape: {type_name} has no element type")]
    UnsupportedShape { type_name: String },

    #[error("unknown type id {0}")]
    UnknownType(TypeId),

    #[error("type {0} is already registered")]
    DuplicateType(String),

    #[error("cyclic type graph: mapping {source_type} to {target_type} re-enters itself")]
    CyclicTypeGraph { source_type: String, target_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to decode TOON document: {0}")]
    Decode(String),

    #[error("failed to encode TOON document: {0}")]
    Encode(String),
}
