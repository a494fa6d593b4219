//! This module defines [`ExtraData`], the consensus extension of a QBFT/IBFT2 block header.
//!
//! On the wire the extra data is the RLP list `[vanity, validators, vote, round, seals]`.
//! The seal-stripped form that validators sign over depends on the [`ConsensusType`]:
//! QBFT replaces the seals with an empty list, IBFT2 omits the field.

use alloy_primitives::{Address, Bytes, B256};
use alloy_rlp::{Decodable, Encodable, Header};
use serde::{Deserialize, Serialize};

use crate::{consensus_type::ConsensusType, error::BesuIBCError};

/// Length of the round field in bytes
pub const ROUND_LENGTH: usize = 4;

/// The decoded extra data of a QBFT/IBFT2 header
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ExtraData {
    /// The vanity data chosen by the proposer
    pub vanity: B256,
    /// The ordered validator set
    pub validators: Vec<Address>,
    /// The validator vote, kept as its raw encoding
    pub vote: RawVote,
    /// The round in which the block was committed
    pub round: [u8; ROUND_LENGTH],
    /// The commit seals, 65 byte recoverable signatures
    pub seals: Vec<Bytes>,
}

/// Whether a [`RawVote`] was encoded as an RLP list or an RLP string.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum VoteKind {
    /// The vote is an RLP list, e.g. `[]` or `[recipient, type]`
    #[default]
    List,
    /// The vote is an RLP string
    Scalar,
}

/// The vote field of the extra data.
///
/// The vote is never interpreted; only its exact encoding matters since it is part of the
/// signed header. A `RawVote` always holds exactly one well formed RLP item.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(try_from = "Bytes", into = "Bytes")]
pub struct RawVote {
    kind: VoteKind,
    encoded: Bytes,
}

impl RawVote {
    /// Wraps the RLP encoding of a single vote item.
    /// # Errors
    /// Returns an error if `encoded` is not exactly one RLP item.
    pub fn from_rlp(encoded: &[u8]) -> Result<Self, BesuIBCError> {
        let mut buf = encoded;
        let vote = Self::decode(&mut buf).map_err(BesuIBCError::ExtraDataDecode)?;
        ensure!(
            buf.is_empty(),
            BesuIBCError::ExtraDataDecode(alloy_rlp::Error::Custom("trailing bytes after vote"))
        );
        Ok(vote)
    }

    /// The shape of the encoded item
    #[must_use]
    pub const fn kind(&self) -> VoteKind {
        self.kind
    }

    /// The full RLP encoding of the item, header included
    #[must_use]
    pub const fn encoded(&self) -> &Bytes {
        &self.encoded
    }
}

impl Default for RawVote {
    /// The empty list, i.e. no vote
    fn default() -> Self {
        Self {
            kind: VoteKind::List,
            encoded: Bytes::from_static(&[alloy_rlp::EMPTY_LIST_CODE]),
        }
    }
}

impl TryFrom<Bytes> for RawVote {
    type Error = BesuIBCError;

    fn try_from(encoded: Bytes) -> Result<Self, Self::Error> {
        Self::from_rlp(&encoded)
    }
}

impl From<RawVote> for Bytes {
    fn from(vote: RawVote) -> Self {
        vote.encoded
    }
}

impl Encodable for RawVote {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        out.put_slice(&self.encoded);
    }

    fn length(&self) -> usize {
        self.encoded.len()
    }
}

impl Decodable for RawVote {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let start = *buf;
        let header = Header::decode(buf)?;
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        // single bytes are their own header, so `Header::decode` leaves them in place
        let consumed = start.len() - buf.len() + header.payload_length;
        *buf = &buf[header.payload_length..];

        Ok(Self {
            kind: if header.list {
                VoteKind::List
            } else {
                VoteKind::Scalar
            },
            encoded: Bytes::copy_from_slice(&start[..consumed]),
        })
    }
}

/// How the seals field is written by [`ExtraData::encode_with`]
#[derive(Clone, Copy)]
enum SealsField {
    All,
    Empty,
    Omitted,
}

impl ExtraData {
    /// Decodes the extra data of a header.
    ///
    /// Both the 5 field form and the 4 field form without seals are accepted.
    /// # Errors
    /// Returns an error if the bytes are not a well formed extra data list or a fixed width
    /// field has the wrong length.
    pub fn decode(extra: &[u8]) -> Result<Self, BesuIBCError> {
        Self::decode_fields(extra).map_err(BesuIBCError::ExtraDataDecode)
    }

    fn decode_fields(mut buf: &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(&mut buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        if buf.len() > header.payload_length {
            return Err(alloy_rlp::Error::Custom("trailing bytes after extra data"));
        }

        let payload = &mut buf;
        let vanity = B256::decode(payload)?;
        let validators = Vec::<Address>::decode(payload)?;
        let vote = RawVote::decode(payload)?;
        let round = <[u8; ROUND_LENGTH]>::decode(payload)?;
        let seals = if payload.is_empty() {
            Vec::new()
        } else {
            Vec::<Bytes>::decode(payload)?
        };
        if !payload.is_empty() {
            return Err(alloy_rlp::Error::Custom("unexpected fields after seals"));
        }

        Ok(Self {
            vanity,
            validators,
            vote,
            round,
            seals,
        })
    }

    /// Encodes the seal-stripped extra data, the form that is part of the signed header.
    #[must_use]
    pub fn encode(&self, consensus_type: ConsensusType) -> Vec<u8> {
        if consensus_type.is_ibft2() {
            self.encode_with(SealsField::Omitted)
        } else {
            self.encode_with(SealsField::Empty)
        }
    }

    /// Encodes the extra data as it appears in a sealed header.
    #[must_use]
    pub fn encode_with_seals(&self) -> Vec<u8> {
        self.encode_with(SealsField::All)
    }

    /// Returns a copy of the extra data without seals.
    #[must_use]
    pub fn without_seals(&self) -> Self {
        Self {
            seals: Vec::new(),
            ..self.clone()
        }
    }

    fn encode_with(&self, seals: SealsField) -> Vec<u8> {
        let no_seals: Vec<Bytes> = Vec::new();
        let seals = match seals {
            SealsField::All => Some(&self.seals),
            SealsField::Empty => Some(&no_seals),
            SealsField::Omitted => None,
        };

        let payload_length = self.vanity.length()
            + self.validators.length()
            + self.vote.length()
            + self.round.length()
            + seals.map_or(0, |seals| seals.length());

        let mut out = Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.vanity.encode(&mut out);
        self.validators.encode(&mut out);
        self.vote.encode(&mut out);
        self.round.encode(&mut out);
        if let Some(seals) = seals {
            seals.encode(&mut out);
        }
        out
    }
}
