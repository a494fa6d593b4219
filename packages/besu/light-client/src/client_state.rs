//! This module defines [`ClientState`].

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    consensus_type::{ConsensusType, UnknownConsensusType},
    error::BesuIBCError,
    height::Height,
    proto, QBFT_CLIENT_TYPE,
};

/// The QBFT client state
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ClientState {
    /// The chain ID
    pub chain_id: U256,
    /// The address of the IBC contract being tracked
    pub ibc_store_address: Address,
    /// The latest trusted height
    pub latest_height: Height,
    /// The trusting period in seconds
    pub trusting_period: u64,
    /// The maximum tolerated clock drift in seconds
    pub max_clock_drift: u64,
    /// The consensus variant of the chain
    pub consensus_type: ConsensusType,
}

impl ClientState {
    /// The client type, always [`QBFT_CLIENT_TYPE`]
    #[must_use]
    pub const fn client_type(&self) -> &'static str {
        QBFT_CLIENT_TYPE
    }

    /// The latest trusted height
    #[must_use]
    pub const fn latest_height(&self) -> Height {
        self.latest_height
    }

    /// Validates the client state.
    ///
    /// Every well formed client state is accepted.
    /// # Errors
    /// Never returns an error.
    #[allow(clippy::unnecessary_wraps)]
    pub const fn validate(&self) -> Result<(), BesuIBCError> {
        Ok(())
    }
}

impl From<ClientState> for proto::ClientState {
    fn from(client_state: ClientState) -> Self {
        Self {
            chain_id: client_state.chain_id.to_be_bytes::<32>().to_vec(),
            ibc_store_address: client_state.ibc_store_address.to_vec(),
            latest_height: Some(client_state.latest_height.into()),
            trusting_period: client_state.trusting_period,
            max_clock_drift: client_state.max_clock_drift,
            consensus_type: client_state.consensus_type.as_str().to_string(),
        }
    }
}

impl TryFrom<proto::ClientState> for ClientState {
    type Error = BesuIBCError;

    fn try_from(raw: proto::ClientState) -> Result<Self, Self::Error> {
        ensure!(
            raw.chain_id.len() == 32,
            BesuIBCError::InvalidLength {
                field: "chain_id",
                expected: 32,
                found: raw.chain_id.len(),
            }
        );
        ensure!(
            raw.ibc_store_address.len() == 20,
            BesuIBCError::InvalidLength {
                field: "ibc_store_address",
                expected: 20,
                found: raw.ibc_store_address.len(),
            }
        );

        Ok(Self {
            chain_id: U256::from_be_slice(&raw.chain_id),
            ibc_store_address: Address::from_slice(&raw.ibc_store_address),
            latest_height: raw
                .latest_height
                .ok_or(BesuIBCError::MissingField("latest_height"))?
                .into(),
            trusting_period: raw.trusting_period,
            max_clock_drift: raw.max_clock_drift,
            consensus_type: raw
                .consensus_type
                .parse()
                .map_err(|UnknownConsensusType(found)| BesuIBCError::UnknownConsensusType(found))?,
        })
    }
}
