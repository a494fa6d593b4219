//! The execution layer JSON-RPC API

pub mod client;
pub mod error;
