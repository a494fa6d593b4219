//! This module defines the storage key derivation for IBC commitments.

use alloy_primitives::{b256, keccak256, B256};

/// The storage slot of the IBC commitment mapping,
/// `keccak256(abi.encode(uint256(keccak256("ibc.commitment")) - 1)) & ~bytes32(uint256(0xff))`
pub const IBC_COMMITMENT_SLOT: B256 =
    b256!("0x1ee222554989dda120e26ecacf756fe1235cd8d726706b57517715dde4f0c900");

/// Computes the storage key of the commitment stored under `path`.
#[must_use = "calculating the commitment key has no effect"]
pub fn commitment_storage_key(path: &[u8]) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(keccak256(path).as_slice());
    preimage[32..].copy_from_slice(IBC_COMMITMENT_SLOT.as_slice());
    keccak256(preimage)
}
