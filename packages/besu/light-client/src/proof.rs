//! This module defines the account and storage proofs fetched from the chain and
//! their wire encoding.

use alloy_primitives::{Bytes, B256};
use alloy_rlp::Header;
use serde::{Deserialize, Serialize};

use crate::error::BesuIBCError;

/// An account proof together with the storage proofs requested alongside it.
///
/// Every proof is the RLP list of its raw trie nodes.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct StateProof {
    /// The proof of the account in the state trie
    pub account_proof: Bytes,
    /// The storage root of the account
    pub storage_hash: B256,
    /// One proof per requested storage key, in request order
    pub storage_proofs: Vec<Bytes>,
}

/// Encodes trie nodes as the RLP list of the raw node encodings.
#[must_use]
pub fn encode_proof_nodes(nodes: &[Bytes]) -> Bytes {
    let payload_length = nodes.iter().fold(0, |length, node| length + node.len());
    let mut out = Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for node in nodes {
        out.extend_from_slice(node);
    }
    out.into()
}

/// Splits an encoded account proof into the encodings of its nodes.
///
/// Every node must be a list of byte strings, i.e. a branch, extension or leaf node
/// without embedded children.
/// # Errors
/// Returns an error if the proof is not a list of such nodes.
pub fn decode_account_proof(proof: &[u8]) -> Result<Vec<Bytes>, BesuIBCError> {
    split_nodes(proof).map_err(BesuIBCError::AccountProofDecode)
}

fn split_nodes(mut buf: &[u8]) -> alloy_rlp::Result<Vec<Bytes>> {
    let mut payload = Header::decode_bytes(&mut buf, true)?;
    if !buf.is_empty() {
        return Err(alloy_rlp::Error::Custom("trailing bytes after proof"));
    }

    let mut nodes = Vec::new();
    while !payload.is_empty() {
        let start = payload;
        let mut fields = Header::decode_bytes(&mut payload, true)?;
        while !fields.is_empty() {
            Header::decode_bytes(&mut fields, false)?;
        }
        nodes.push(Bytes::copy_from_slice(&start[..start.len() - payload.len()]));
    }
    Ok(nodes)
}

#[cfg(test)]
mod test {
    use alloy_primitives::{bytes, hex};
    use alloy_rlp::Encodable;

    use super::*;

    fn leaf() -> Bytes {
        let mut out = Vec::new();
        vec![bytes!("0x20aa"), Bytes::from(vec![0x42; 40])].encode(&mut out);
        out.into()
    }

    fn branch() -> Bytes {
        let mut children = vec![Bytes::new(); 17];
        children[3] = Bytes::from(vec![0x33; 32]);
        children[9] = Bytes::from(vec![0x99; 32]);
        let mut out = Vec::new();
        children.encode(&mut out);
        out.into()
    }

    #[test]
    fn encoded_nodes_split_back_into_the_same_nodes() {
        let nodes = vec![branch(), leaf()];
        let encoded = encode_proof_nodes(&nodes);

        assert_eq!(decode_account_proof(&encoded).unwrap(), nodes);
    }

    #[test]
    fn prefixes_nodes_with_a_list_header() {
        let encoded = encode_proof_nodes(&[bytes!("0xc20102"), bytes!("0xc3820304")]);
        assert_eq!(encoded, bytes!("0xc7c20102c3820304"));
    }

    #[test]
    fn empty_proof_has_no_nodes() {
        let encoded = encode_proof_nodes(&[]);
        assert_eq!(encoded, bytes!("0xc0"));
        assert!(decode_account_proof(&encoded).unwrap().is_empty());
    }

    #[test]
    fn rejects_nodes_with_embedded_lists() {
        // [[0x01, [0x02]]]
        assert!(matches!(
            decode_account_proof(&hex!("0xc4c301c102")),
            Err(BesuIBCError::AccountProofDecode(_))
        ));
    }

    #[test]
    fn rejects_malformed_proofs() {
        let encoded = encode_proof_nodes(&[branch(), leaf()]);
        assert!(decode_account_proof(&encoded[..encoded.len() - 1]).is_err());
        // a string instead of a list of nodes
        assert!(decode_account_proof(&hex!("0x820102")).is_err());
        // a node that is not a list
        assert!(decode_account_proof(&hex!("0xc3820102")).is_err());
        assert!(decode_account_proof(&[]).is_err());
    }
}
