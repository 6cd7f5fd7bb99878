//! Ledger query error types.

use attest_core::NetworkId;

use crate::config::ConfigError;

/// Errors from ledger queries. All of them mean "could not check".
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// HTTP transport error.
    #[error("HTTP error calling network {network}: {source}")]
    Http {
        network: NetworkId,
        source: reqwest::Error,
    },

    /// The endpoint did not answer within the configured timeout.
    #[error("network {network} timed out")]
    Timeout { network: NetworkId },

    /// The endpoint returned a non-2xx status.
    #[error("network {network} returned HTTP {status}")]
    Status { network: NetworkId, status: u16 },

    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error from network {network}: {message}")]
    Rpc { network: NetworkId, message: String },

    /// The response could not be decoded into the expected value.
    #[error("cannot decode {query} response: {reason}")]
    Decode { query: &'static str, reason: String },

    /// A query targeted a network with no configured endpoint.
    #[error("no endpoint configured for network {0}")]
    UnknownNetwork(NetworkId),

    /// The ledger is unavailable for another reason.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
