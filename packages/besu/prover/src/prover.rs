//! This module defines [`Prover`], the surface a relayer drives to keep a QBFT light client
//! on the counterparty chain up to date.

use alloy_primitives::{Bytes, U256};
use besu_light_client::{
    client_state::ClientState,
    commitment::commitment_storage_key,
    consensus_state::ConsensusState,
    extra::ExtraData,
    header::Header,
    height::Height,
    proto::{self, TypedMessage},
    verify::verify_header_seals,
};
use ibc_proto::google::protobuf::Any;
use prost::Message;
use tracing::{debug, info, instrument, warn};

use crate::{chain::ChainClient, config::ProverConfig, error::ProverError};

/// Produces light client states, verified headers and state proofs of a QBFT chain
#[derive(Clone, Debug)]
pub struct Prover<C> {
    chain: C,
    config: ProverConfig,
}

impl<C: ChainClient> Prover<C> {
    /// Create a new prover
    pub const fn new(chain: C, config: ProverConfig) -> Self {
        Self { chain, config }
    }

    /// Create a new prover from the JSON prover config.
    ///
    /// The config is validated before the chain is touched.
    /// # Errors
    /// Returns an error if the config is invalid.
    pub fn from_config_value(chain: C, config: serde_json::Value) -> Result<Self, ProverError> {
        Ok(Self::new(chain, ProverConfig::from_value(config)?))
    }

    /// The prover configuration
    #[must_use]
    pub const fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Builds the client and consensus state of a new light client at `height`, or at the
    /// latest block if `None`.
    /// # Errors
    /// Returns an error if a chain request fails or the block extra data is malformed.
    #[instrument(skip(self), err(Display))]
    pub async fn create_initial_light_client_state(
        &self,
        height: Option<Height>,
    ) -> Result<(ClientState, ConsensusState), ProverError> {
        let header = self
            .chain
            .header_by_number(height.map(|height| height.revision_height))
            .await
            .map_err(ProverError::ChainRequest)?;
        let extra = ExtraData::decode(&header.extra_data)?;
        let proof = self
            .chain
            .get_proof(self.chain.ibc_address(), vec![], header.number)
            .await
            .map_err(ProverError::ChainRequest)?;
        let chain_id = self
            .chain
            .chain_id()
            .await
            .map_err(ProverError::ChainRequest)?;

        let client_state = ClientState {
            chain_id: U256::from(chain_id),
            ibc_store_address: self.chain.ibc_address(),
            latest_height: Height::from_block_number(header.number),
            trusting_period: self.config.trusting_period().as_secs(),
            max_clock_drift: self.config.max_clock_drift().as_secs(),
            consensus_type: self.config.consensus_type(),
        };
        let consensus_state = ConsensusState {
            timestamp: header.timestamp,
            root: proof.storage_hash,
            validators: extra.validators,
        };

        info!(
            block_number = header.number,
            validators = consensus_state.validators.len(),
            "created initial light client state"
        );

        Ok((client_state, consensus_state))
    }

    /// Fetches the latest block and returns it as a seal-verified [`Header`] without a trusted
    /// height.
    /// # Errors
    /// Returns an error if a chain request fails or the block is not sealed by a quorum.
    #[instrument(skip(self), err(Display))]
    pub async fn get_latest_finalized_header(&self) -> Result<Header, ProverError> {
        let header = self
            .chain
            .header_by_number(None)
            .await
            .map_err(ProverError::ChainRequest)?;
        let extra = ExtraData::decode(&header.extra_data)?;

        let verified = verify_header_seals(&header, &extra, self.config.consensus_type())
            .inspect_err(|e| warn!(block_number = header.number, "rejecting header: {e}"))?;
        debug!(
            block_number = header.number,
            matched = verified.matched,
            validators = extra.validators.len(),
            "verified header seals"
        );

        let proof = self
            .chain
            .get_proof(self.chain.ibc_address(), vec![], header.number)
            .await
            .map_err(ProverError::ChainRequest)?;

        Ok(Header {
            besu_header_rlp: verified.header_rlp,
            seals: verified.ordered_seals,
            account_state_proof: proof.account_proof,
            trusted_height: None,
        })
    }

    /// Attaches the latest height of this client on the counterparty to `header`.
    ///
    /// `counterparty_client_state` is the client state the counterparty currently stores for
    /// this light client. Always returns exactly one header.
    /// # Errors
    /// Returns an error if `header` fails basic validation or the client state is not a QBFT
    /// client state.
    #[instrument(skip_all, err(Display))]
    #[allow(clippy::unused_self)]
    pub fn setup_headers_for_update(
        &self,
        counterparty_client_state: &Any,
        mut header: Header,
    ) -> Result<Vec<Header>, ProverError> {
        header.validate_basic()?;
        let client_state =
            ClientState::try_from(proto::ClientState::from_any(counterparty_client_state)?)?;

        header.trusted_height = Some(client_state.latest_height());
        debug!(
            height = header.height().revision_height,
            trusted_height = client_state.latest_height().revision_height,
            "prepared header for update"
        );

        Ok(vec![header])
    }

    /// Fetches the latest verified header and prepares it for updating the client described
    /// by `counterparty_client_state`.
    /// # Errors
    /// Returns an error if fetching or preparing the header fails.
    pub async fn update_header(
        &self,
        counterparty_client_state: &Any,
    ) -> Result<Vec<Header>, ProverError> {
        let header = self.get_latest_finalized_header().await?;
        self.setup_headers_for_update(counterparty_client_state, header)
    }

    /// Returns the storage proof of the commitment at `path` in the IBC contract at `height`,
    /// together with the proof height.
    /// # Errors
    /// Returns an error if the chain request fails or returns no storage proof.
    #[instrument(skip(self, path), fields(path = %String::from_utf8_lossy(path)), err(Display))]
    pub async fn prove_state(
        &self,
        height: Height,
        path: &[u8],
    ) -> Result<(Bytes, Height), ProverError> {
        let block_number = height.revision_height;
        let key = commitment_storage_key(path);

        let proof = self
            .chain
            .get_proof(self.chain.ibc_address(), vec![key], block_number)
            .await
            .map_err(ProverError::ChainRequest)?;
        let storage_proof = proof
            .storage_proofs
            .into_iter()
            .next()
            .ok_or(ProverError::MissingStorageProof { block_number })?;

        Ok((storage_proof, Height::from_block_number(block_number)))
    }

    /// Encodes the consensus state of this chain as stored by the counterparty.
    /// # Errors
    /// Returns an error if `consensus_state` is not a QBFT consensus state.
    #[instrument(skip(self, consensus_state), err(Display))]
    #[allow(clippy::unused_self)]
    pub fn prove_host_consensus_state(
        &self,
        height: Height,
        consensus_state: &Any,
    ) -> Result<Vec<u8>, ProverError> {
        proto::ConsensusState::from_any(consensus_state)?;
        Ok(consensus_state.encode_to_vec())
    }
}
