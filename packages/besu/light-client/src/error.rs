//! This module defines [`BesuIBCError`].

/// Error types for the Besu QBFT/IBFT2 light client
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BesuIBCError {
    /// The header extra data is not a valid consensus extra data encoding
    #[error("invalid extra data: {0}")]
    ExtraDataDecode(alloy_rlp::Error),

    /// The header RLP could not be decoded
    #[error("invalid header rlp: {0}")]
    HeaderDecode(alloy_rlp::Error),

    /// The account proof could not be decoded into trie nodes
    #[error("invalid account proof: {0}")]
    AccountProofDecode(alloy_rlp::Error),

    /// A seal could not be turned into a signer address
    #[error("failed to recover signer of seal {index}: {reason}")]
    SealRecovery {
        /// Position of the seal in the extra data
        index: usize,
        /// Reason for error
        reason: String,
    },

    /// Not enough validators signed the header
    #[error("insufficient voting: {matched} > {threshold} does not hold")]
    InsufficientQuorum {
        /// Number of validators whose seal was recovered
        matched: usize,
        /// Count the matched seals must strictly exceed
        threshold: usize,
    },

    /// A protobuf `Any` carries a different message than expected
    #[error("type mismatch, expected ({expected}) but found ({found})")]
    TypeMismatch {
        /// Expected type url
        expected: String,
        /// Found type url
        found: String,
    },

    /// A protobuf message could not be decoded
    #[error("protobuf decoding failed: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    /// The consensus type of a client state is not supported
    #[error("invalid consensus type: {0}")]
    UnknownConsensusType(String),

    /// A required protobuf field is missing
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A fixed width field has the wrong length
    #[error("invalid length for `{field}`, expected {expected} but found {found}")]
    InvalidLength {
        /// Field name
        field: &'static str,
        /// Expected length
        expected: usize,
        /// Found length
        found: usize,
    },
}
