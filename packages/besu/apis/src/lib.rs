//! JSON-RPC access to Hyperledger Besu nodes
#![deny(clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

pub mod eth_api;
