//! This module defines errors for `EthApiClient`.

use alloy_rpc_types_eth::BlockNumberOrTag;
use alloy_transport::TransportError;

/// Error types for Besu API client operations
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum EthClientError {
    /// Provider error
    #[error("provider error: {0}")]
    ProviderError(#[from] TransportError),

    /// The node URL could not be parsed
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Block not found error
    #[error("block not found for block {0}")]
    BlockNotFound(BlockNumberOrTag),
}
