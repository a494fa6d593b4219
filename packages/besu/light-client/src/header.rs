//! This module defines [`Header`], the artifact relayed to the counterparty chain.

use alloy_consensus::Header as EthHeader;
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    canonical::decode_header_rlp, error::BesuIBCError, height::Height, proof::decode_account_proof,
    proto, QBFT_CLIENT_TYPE,
};

/// A seal-verified QBFT header with the IBC contract account proof at its height
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Header {
    /// The seal-stripped RLP encoding of the block header
    pub besu_header_rlp: Bytes,
    /// The commit seals, one slot per validator of the header, `None` where the validator did
    /// not seal
    pub seals: Vec<Option<Bytes>>,
    /// The RLP encoded account proof of the IBC contract
    pub account_state_proof: Bytes,
    /// The latest height of this client on the counterparty, set before submission
    pub trusted_height: Option<Height>,
}

impl Header {
    /// The client type, always [`QBFT_CLIENT_TYPE`]
    #[must_use]
    pub const fn client_type(&self) -> &'static str {
        QBFT_CLIENT_TYPE
    }

    /// Checks that the embedded block header and account proof decode.
    /// # Errors
    /// Returns an error if either of them is malformed.
    pub fn validate_basic(&self) -> Result<(), BesuIBCError> {
        self.eth_header()?;
        decode_account_proof(&self.account_state_proof)?;
        Ok(())
    }

    /// Decodes the embedded block header.
    /// # Errors
    /// Returns an error if the block header is malformed.
    pub fn eth_header(&self) -> Result<EthHeader, BesuIBCError> {
        decode_header_rlp(&self.besu_header_rlp)
    }

    /// The height of the embedded block header.
    /// # Panics
    /// Panics if the block header does not decode. Only call this on headers that passed
    /// [`Header::validate_basic`].
    #[must_use]
    pub fn height(&self) -> Height {
        match self.eth_header() {
            Ok(header) => Height::from_block_number(header.number),
            Err(e) => panic!("height of a header that fails basic validation: {e}"),
        }
    }
}

impl From<Header> for proto::Header {
    fn from(header: Header) -> Self {
        Self {
            besu_header_rlp: header.besu_header_rlp.to_vec(),
            seals: header
                .seals
                .into_iter()
                .map(|seal| seal.map(|seal| seal.to_vec()).unwrap_or_default())
                .collect(),
            trusted_height: header.trusted_height.map(Into::into),
            account_state_proof: header.account_state_proof.to_vec(),
        }
    }
}

impl From<proto::Header> for Header {
    fn from(raw: proto::Header) -> Self {
        Self {
            besu_header_rlp: raw.besu_header_rlp.into(),
            seals: raw
                .seals
                .into_iter()
                .map(|seal| (!seal.is_empty()).then(|| seal.into()))
                .collect(),
            account_state_proof: raw.account_state_proof.into(),
            trusted_height: raw.trusted_height.map(Into::into),
        }
    }
}
