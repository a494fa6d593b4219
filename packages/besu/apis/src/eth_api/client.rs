//! This module implements the `EthApiClient` to interact with the Besu RPC API.

use alloy_consensus::Header as EthHeader;
use alloy_network::Ethereum;
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{BlockNumberOrTag, EIP1186AccountProofResponse};

use super::error::EthClientError;

/// The api client for interacting with the execution RPC API of a Besu node
#[derive(Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EthApiClient<P: Provider + Clone> {
    provider: P,
}

impl EthApiClient<RootProvider> {
    /// Create new `EthApiClient` talking to the node at `url` over HTTP
    /// # Errors
    /// Returns an error if `url` is not a valid URL
    pub fn new_http(url: &str) -> Result<Self, EthClientError> {
        let parsed = url
            .parse()
            .map_err(|_| EthClientError::InvalidUrl(url.to_string()))?;
        Ok(Self::new(RootProvider::<Ethereum>::new_http(parsed)))
    }
}

impl<P: Provider + Clone> EthApiClient<P> {
    /// Create new `EthApiClient`
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetches the header of the block at `block_number`, or of the latest block if `None`.
    /// # Errors
    /// Returns an error if the request fails or the block does not exist
    pub async fn header_by_number(
        &self,
        block_number: Option<u64>,
    ) -> Result<EthHeader, EthClientError> {
        let tag = block_number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);
        tracing::debug!(block = %tag, "fetching block header");

        let block = self
            .provider
            .get_block_by_number(tag)
            .await?
            .ok_or(EthClientError::BlockNotFound(tag))?;

        Ok(block.header.inner)
    }

    /// Fetches the proof of `address` and the given storage keys at `block_number`.
    /// # Errors
    /// Returns an error if the request fails
    pub async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block_number: u64,
    ) -> Result<EIP1186AccountProofResponse, EthClientError> {
        tracing::debug!(%address, keys = storage_keys.len(), block_number, "fetching proof");

        Ok(self
            .provider
            .get_proof(address, storage_keys)
            .number(block_number)
            .await?)
    }

    /// Fetches the chain id.
    /// # Errors
    /// Returns an error if the request fails
    pub async fn chain_id(&self) -> Result<u64, EthClientError> {
        Ok(self.provider.get_chain_id().await?)
    }
}
