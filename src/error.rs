//! Error types for the SPDK RPC client.

use serde::{Deserialize, Serialize};

/// Failure of a single RPC call.
///
/// Facade functions hand these back exactly as the transport produced them,
/// so callers can tell a dead socket apart from a method the server rejected.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum RpcError {
    // Transport Errors
    /// Could not reach the RPC server
    #[error("Connection to {address} failed: {reason}")]
    ConnectionFailed { address: String, reason: String },

    /// Connection dropped mid-call
    #[error("Connection lost: {reason}")]
    ConnectionLost { reason: String },

    /// No response within the configured timeout
    #[error("Timed out after {timeout_ms}ms waiting for response to {method}")]
    Timeout { method: String, timeout_ms: u64 },

    // Server Errors
    /// The server answered with a JSON-RPC error object
    #[error("{method} failed with code {code}: {message}")]
    Server {
        method: String,
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    // Protocol Errors
    /// The response could not be interpreted as a JSON-RPC reply
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// The request could not be encoded
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl RpcError {
    /// True for failures that originate below the RPC layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RpcError::ConnectionFailed { .. }
                | RpcError::ConnectionLost { .. }
                | RpcError::Timeout { .. }
        )
    }

    /// True when the server itself rejected the call.
    pub fn is_server(&self) -> bool {
        matches!(self, RpcError::Server { .. })
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::SerializationError {
            message: e.to_string(),
        }
    }
}

/// Failure while building the alias registry.
///
/// Only raised at registration time; calls made through a legacy name never
/// produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The legacy name is already bound to another method
    #[error("Legacy name '{legacy}' already maps to '{existing}', cannot map it to '{requested}'")]
    AliasConflict {
        legacy: String,
        existing: String,
        requested: String,
    },

    /// The legacy name is some method's canonical name
    #[error("Legacy name '{legacy}' is already a canonical method name")]
    AliasShadowsCanonical { legacy: String },

    /// The method is already registered with other legacy names
    #[error("Method '{canonical}' is already registered with a different set of legacy names")]
    LegacyListMismatch { canonical: String },
}

/// Failure of a by-name invocation through the method table.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// Neither a canonical nor a legacy name in the table
    #[error("Unknown method: {name}")]
    UnknownMethod { name: String },

    /// Arguments did not decode into the method's parameters
    #[error("Invalid arguments for {method}: {source}")]
    InvalidArguments {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Result alias for facade calls.
pub type RpcResult<T> = Result<T, RpcError>;
