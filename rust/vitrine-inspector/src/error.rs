use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitrine_store::StoreError;

use crate::UNSUPPORTED_QUERY;

/// Failures while answering an inspector request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InspectorError {
    /// The query text is outside the recognised `SELECT` shapes, or names a
    /// table that does not exist
    #[error("{UNSUPPORTED_QUERY}")]
    UnsupportedQuery,

    /// The store could not be opened or read; carries the store's message
    #[error("{0}")]
    Store(String),
}

impl From<StoreError> for InspectorError {
    fn from(value: StoreError) -> Self {
        InspectorError::Store(format!("{value}"))
    }
}

/// Invalid inspector configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file name pattern did not compile
    #[error("Invalid file name pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The default scan directory could not be determined
    #[error("Could not determine the working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

/// A failed remote call, reported to the DevTools client as a JSON-RPC
/// error object
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i64,
    /// Human readable explanation
    pub message: String,
}

impl RpcError {
    /// Code for a method the domain does not implement
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Code for parameters that could not be decoded
    pub const INVALID_PARAMS: i64 = -32602;
    /// Code for a failure while serving an otherwise valid call
    pub const INTERNAL_ERROR: i64 = -32603;

    /// The named method does not exist in `domain`
    pub fn method_not_found(domain: &str, method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: format!("Method '{domain}.{method}' not implemented"),
        }
    }

    /// The parameters did not have the expected shape
    pub fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: format!("Invalid params: {message}"),
        }
    }

    /// The call was understood but could not be served
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self {
            code: Self::INTERNAL_ERROR,
            message: message.to_string(),
        }
    }
}
