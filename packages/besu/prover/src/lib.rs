//! The relayer-side prover of the Hyperledger Besu QBFT/IBFT2 light client.
//!
//! [`prover::Prover`] turns blocks and storage proofs fetched through a [`chain::ChainClient`]
//! into the client states, headers and proofs submitted to the counterparty chain.

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

pub mod chain;
pub mod config;
pub mod duration;
pub mod error;
pub mod prover;

pub use besu_light_client;
