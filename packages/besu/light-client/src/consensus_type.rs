//! This module defines [`ConsensusType`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The BFT consensus flavour of the source chain.
///
/// The flavour only changes how the seal-stripped extra data is encoded: IBFT2 drops the
/// commit seals field entirely while QBFT keeps it as an empty list. Both shapes decode.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusType {
    /// Not configured; behaves like [`ConsensusType::Qbft`]
    #[default]
    #[serde(rename = "")]
    Unspecified,
    /// QBFT consensus
    Qbft,
    /// IBFT 2.0 consensus
    Ibft2,
}

impl ConsensusType {
    /// Returns true if the legacy IBFT2 encoding applies.
    #[must_use]
    pub const fn is_ibft2(self) -> bool {
        matches!(self, Self::Ibft2)
    }

    /// Returns the configuration string of the consensus type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Qbft => "qbft",
            Self::Ibft2 => "ibft2",
        }
    }
}

impl fmt::Display for ConsensusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown consensus type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid consensus type: {0}")]
pub struct UnknownConsensusType(pub String);

impl FromStr for ConsensusType {
    type Err = UnknownConsensusType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Unspecified),
            "qbft" => Ok(Self::Qbft),
            "ibft2" => Ok(Self::Ibft2),
            other => Err(UnknownConsensusType(other.to_string())),
        }
    }
}
