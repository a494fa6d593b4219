//! This module defines [`ChainClient`], the prover's view of the source chain, and its
//! JSON-RPC implementation [`EthChain`].

use alloy_consensus::Header as EthHeader;
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::EIP1186AccountProofResponse;
use besu_apis::eth_api::{client::EthApiClient, error::EthClientError};
use besu_light_client::proof::{encode_proof_nodes, StateProof};

/// Read access to the source chain.
///
/// Every call is a single request with no retries; callers impose their own deadlines.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Fetches the block header at `block_number`, or the latest one if `None`.
    async fn header_by_number(&self, block_number: Option<u64>) -> anyhow::Result<EthHeader>;

    /// Fetches the account proof of `address` and the proofs of `storage_keys` at `block_number`.
    async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block_number: u64,
    ) -> anyhow::Result<StateProof>;

    /// Fetches the chain id.
    async fn chain_id(&self) -> anyhow::Result<u64>;

    /// The address of the IBC contract on the chain.
    fn ibc_address(&self) -> Address;
}

/// A [`ChainClient`] backed by a Besu JSON-RPC endpoint
#[derive(Clone, Debug)]
pub struct EthChain<P: Provider + Clone> {
    client: EthApiClient<P>,
    ibc_address: Address,
}

impl EthChain<RootProvider> {
    /// Connects to the node at `rpc_url` over HTTP.
    /// # Errors
    /// Returns an error if `rpc_url` is not a valid URL
    pub fn new_http(rpc_url: &str, ibc_address: Address) -> Result<Self, EthClientError> {
        Ok(Self::new(EthApiClient::new_http(rpc_url)?, ibc_address))
    }
}

impl<P: Provider + Clone> EthChain<P> {
    /// Create a new chain handle
    pub const fn new(client: EthApiClient<P>, ibc_address: Address) -> Self {
        Self {
            client,
            ibc_address,
        }
    }
}

#[async_trait::async_trait]
impl<P: Provider + Clone> ChainClient for EthChain<P> {
    async fn header_by_number(&self, block_number: Option<u64>) -> anyhow::Result<EthHeader> {
        Ok(self.client.header_by_number(block_number).await?)
    }

    async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block_number: u64,
    ) -> anyhow::Result<StateProof> {
        let response = self
            .client
            .get_proof(address, storage_keys, block_number)
            .await?;
        Ok(state_proof_from_response(&response))
    }

    async fn chain_id(&self) -> anyhow::Result<u64> {
        Ok(self.client.chain_id().await?)
    }

    fn ibc_address(&self) -> Address {
        self.ibc_address
    }
}

/// Packs the node lists of an `eth_getProof` response into RLP proof lists.
#[must_use]
pub fn state_proof_from_response(response: &EIP1186AccountProofResponse) -> StateProof {
    StateProof {
        account_proof: encode_proof_nodes(&response.account_proof),
        storage_hash: response.storage_hash,
        storage_proofs: response
            .storage_proof
            .iter()
            .map(|storage_proof| encode_proof_nodes(&storage_proof.proof))
            .collect(),
    }
}
