#![doc = "Verification core of the Hyperledger Besu QBFT/IBFT2 light client for IBC"]
#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Return early with the given error if the condition does not hold.
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub mod canonical;
pub mod client_state;
pub mod commitment;
pub mod consensus_state;
pub mod consensus_type;
pub mod error;
pub mod extra;
pub mod header;
pub mod height;
pub mod proof;
pub mod proto;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// The IBC client type of the QBFT light client.
pub const QBFT_CLIENT_TYPE: &str = "hb-qbft";
