//! This module defines [`ConsensusState`].

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::{error::BesuIBCError, proto};

/// The consensus state of the QBFT light client at a trusted height
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ConsensusState {
    /// The block timestamp (unix seconds)
    pub timestamp: u64,
    /// The storage root of the IBC contract
    pub root: B256,
    /// The validator set of the block
    pub validators: Vec<Address>,
}

impl From<ConsensusState> for proto::ConsensusState {
    fn from(consensus_state: ConsensusState) -> Self {
        Self {
            timestamp: consensus_state.timestamp,
            root: consensus_state.root.to_vec(),
            validators: consensus_state
                .validators
                .iter()
                .map(|validator| validator.to_vec())
                .collect(),
        }
    }
}

impl TryFrom<proto::ConsensusState> for ConsensusState {
    type Error = BesuIBCError;

    fn try_from(raw: proto::ConsensusState) -> Result<Self, Self::Error> {
        ensure!(
            raw.root.len() == 32,
            BesuIBCError::InvalidLength {
                field: "root",
                expected: 32,
                found: raw.root.len(),
            }
        );
        let validators = raw
            .validators
            .iter()
            .map(|validator| {
                ensure!(
                    validator.len() == 20,
                    BesuIBCError::InvalidLength {
                        field: "validators",
                        expected: 20,
                        found: validator.len(),
                    }
                );
                Ok(Address::from_slice(validator))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            timestamp: raw.timestamp,
            root: B256::from_slice(&raw.root),
            validators,
        })
    }
}
