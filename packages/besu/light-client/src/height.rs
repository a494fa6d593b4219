//! This module defines [`Height`].

use serde::{Deserialize, Serialize};

/// An IBC height of the QBFT chain
#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default)]
pub struct Height {
    /// The revision number
    /// This is always 0 for QBFT chains
    #[serde(default)]
    pub revision_number: u64,
    /// The block number
    pub revision_height: u64,
}

impl Height {
    /// The height of block `number`.
    #[must_use]
    pub const fn from_block_number(number: u64) -> Self {
        Self {
            revision_number: 0,
            revision_height: number,
        }
    }
}

impl From<Height> for ibc_proto::ibc::core::client::v1::Height {
    fn from(height: Height) -> Self {
        Self {
            revision_number: height.revision_number,
            revision_height: height.revision_height,
        }
    }
}

impl From<ibc_proto::ibc::core::client::v1::Height> for Height {
    fn from(height: ibc_proto::ibc::core::client::v1::Height) -> Self {
        Self {
            revision_number: height.revision_number,
            revision_height: height.revision_height,
        }
    }
}
