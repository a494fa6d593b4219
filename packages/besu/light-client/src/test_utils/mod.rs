//! Test utilities for the QBFT light client

#[allow(
    missing_docs,
    clippy::borrow_interior_mutable_const,
    clippy::declare_interior_mutable_const,
    clippy::missing_panics_doc,
    clippy::redundant_closure_for_method_calls
)]
pub mod signers {
    use std::{cell::LazyCell, ops::Range};

    use alloy_primitives::{Address, Bytes, B256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;

    pub const SIGNERS: LazyCell<Vec<PrivateKeySigner>> = LazyCell::new(|| {
        [0xcd, 0x02, 0x03, 0x10, 0x1f, 0x21, 0x22, 0x23]
            .into_iter()
            .map(|byte| PrivateKeySigner::from_slice(&[byte; 32]).expect("valid key"))
            .collect()
    });

    #[must_use]
    pub fn signer_addresses(range: Range<usize>) -> Vec<Address> {
        SIGNERS[range].iter().map(|s| s.address()).collect()
    }

    /// Signs `digest` with the signer at `index`, in the `r || s || v` layout with `v` in `{0, 1}`.
    #[must_use]
    pub fn seal(index: usize, digest: &B256) -> Bytes {
        let mut sig = SIGNERS[index]
            .sign_hash_sync(digest)
            .expect("signing should work")
            .as_bytes();
        sig[64] -= 27;
        Bytes::from(sig.to_vec())
    }
}

#[allow(missing_docs, clippy::missing_panics_doc)]
pub mod fixtures {
    use alloy_consensus::Header as EthHeader;
    use alloy_primitives::{address, Address, Bytes, B256, U256};

    use super::signers::seal;
    use crate::{
        canonical::{canonical_header_rlp, seal_digest},
        consensus_type::ConsensusType,
        extra::{ExtraData, RawVote},
    };

    pub const DEFAULT_HEIGHT: u64 = 100;
    pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

    /// A header together with its decoded extra data
    #[derive(Clone, Debug)]
    pub struct SealedHeader {
        pub header: EthHeader,
        pub extra: ExtraData,
    }

    #[must_use]
    pub fn unsealed_header(number: u64) -> EthHeader {
        EthHeader {
            parent_hash: B256::repeat_byte(0x11),
            beneficiary: address!("0xca31306798b41bc81c43094a1e0462890ce7a673"),
            state_root: B256::repeat_byte(0x22),
            number,
            gas_limit: 0x1fff_ffff_ffff_ff,
            timestamp: GENESIS_TIMESTAMP + number * 2,
            difficulty: U256::from(1),
            mix_hash: B256::repeat_byte(0x63),
            base_fee_per_gas: Some(0),
            ..Default::default()
        }
    }

    /// Builds a header at [`DEFAULT_HEIGHT`] sealed by the signers at the `sealers` indices.
    #[must_use]
    pub fn sealed_header(
        validators: &[Address],
        sealers: &[usize],
        consensus_type: ConsensusType,
    ) -> SealedHeader {
        sealed_header_at(DEFAULT_HEIGHT, validators, sealers, consensus_type)
    }

    #[must_use]
    pub fn sealed_header_at(
        number: u64,
        validators: &[Address],
        sealers: &[usize],
        consensus_type: ConsensusType,
    ) -> SealedHeader {
        let mut extra = ExtraData {
            vanity: B256::ZERO,
            validators: validators.to_vec(),
            vote: RawVote::default(),
            round: [0, 0, 0, 1],
            seals: Vec::new(),
        };
        let mut header = unsealed_header(number);

        let digest = seal_digest(&canonical_header_rlp(&header, &extra.encode(consensus_type)));
        extra.seals = sealers.iter().map(|&index| seal(index, &digest)).collect();
        header.extra_data = Bytes::from(extra.encode_with_seals());

        SealedHeader { header, extra }
    }
}
