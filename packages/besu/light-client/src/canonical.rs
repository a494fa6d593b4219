//! The canonical, seal-stripped encoding of a block header.

use alloy_consensus::Header as EthHeader;
use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::Decodable;

use crate::error::BesuIBCError;

/// Decodes an RLP encoded block header.
/// # Errors
/// Returns an error if the bytes are not a single well formed header.
pub fn decode_header_rlp(raw: &[u8]) -> Result<EthHeader, BesuIBCError> {
    let mut buf = raw;
    let header = EthHeader::decode(&mut buf).map_err(BesuIBCError::HeaderDecode)?;
    ensure!(
        buf.is_empty(),
        BesuIBCError::HeaderDecode(alloy_rlp::Error::Custom("trailing bytes after header"))
    );
    Ok(header)
}

/// Encodes `header` with its extra data replaced by `stripped_extra`.
///
/// The result is the pre-image signed by the committing validators and the header
/// representation sent to the counterparty chain.
#[must_use]
pub fn canonical_header_rlp(header: &EthHeader, stripped_extra: &[u8]) -> Bytes {
    let canonical = EthHeader {
        extra_data: Bytes::copy_from_slice(stripped_extra),
        ..header.clone()
    };
    alloy_rlp::encode(&canonical).into()
}

/// The digest the commit seals are produced over.
#[must_use]
pub fn seal_digest(canonical_header_rlp: &[u8]) -> B256 {
    keccak256(canonical_header_rlp)
}
