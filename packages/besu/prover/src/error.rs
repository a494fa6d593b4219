//! This module defines [`ProverError`].

use besu_light_client::error::BesuIBCError;

use crate::config::ConfigError;

/// Error types of the prover
#[derive(thiserror::Error, Debug)]
pub enum ProverError {
    /// A request to the chain failed; the caller may retry
    #[error("chain request failed: {0:#}")]
    ChainRequest(anyhow::Error),

    /// A fetched or supplied header, state or proof failed verification
    #[error(transparent)]
    Verification(#[from] BesuIBCError),

    /// The chain returned no storage proof for the requested key
    #[error("no storage proof returned at block {block_number}")]
    MissingStorageProof {
        /// Block number of the request
        block_number: u64,
    },

    /// The prover configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
