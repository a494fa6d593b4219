//! This module defines the quorum check over the commit seals of a header.

use std::collections::HashMap;

use alloy_consensus::Header as EthHeader;
use alloy_primitives::{Address, Bytes, Signature, B256};

use crate::{
    canonical::{canonical_header_rlp, seal_digest},
    consensus_type::ConsensusType,
    error::BesuIBCError,
    extra::ExtraData,
};

/// Length of a commit seal, `r || s || v`
pub const SEAL_LENGTH: usize = 65;

/// The outcome of a successful quorum check
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedSeals {
    /// The seal-stripped header encoding the seals were verified against
    pub header_rlp: Bytes,
    /// One slot per validator, in validator order, `None` where no seal matched
    pub ordered_seals: Vec<Option<Bytes>>,
    /// Number of validators with a matching seal
    pub matched: usize,
}

/// The number of matching seals that must be exceeded for `validator_count` validators.
#[must_use]
pub const fn quorum_threshold(validator_count: usize) -> usize {
    validator_count * 2 / 3
}

/// Verifies that more than two thirds of `extra.validators` sealed `header`.
///
/// `extra` is the decoded extra data of `header`. The seals are checked against the
/// seal-stripped encoding selected by `consensus_type`.
/// # Errors
/// Returns an error if a seal cannot be recovered or the quorum is not reached.
pub fn verify_header_seals(
    header: &EthHeader,
    extra: &ExtraData,
    consensus_type: ConsensusType,
) -> Result<VerifiedSeals, BesuIBCError> {
    let header_rlp = canonical_header_rlp(header, &extra.encode(consensus_type));
    let digest = seal_digest(&header_rlp);

    let mut seals_by_signer = HashMap::with_capacity(extra.seals.len());
    for (index, seal) in extra.seals.iter().enumerate() {
        let signer = recover_signer(&digest, seal)
            .map_err(|reason| BesuIBCError::SealRecovery { index, reason })?;
        seals_by_signer.insert(signer, seal);
    }

    let ordered_seals: Vec<Option<Bytes>> = extra
        .validators
        .iter()
        .map(|validator| seals_by_signer.get(validator).map(|&seal| seal.clone()))
        .collect();
    let matched = ordered_seals.iter().flatten().count();
    let threshold = quorum_threshold(extra.validators.len());

    ensure!(
        matched > threshold,
        BesuIBCError::InsufficientQuorum { matched, threshold }
    );

    Ok(VerifiedSeals {
        header_rlp,
        ordered_seals,
        matched,
    })
}

fn recover_signer(digest: &B256, seal: &[u8]) -> Result<Address, String> {
    ensure!(
        seal.len() == SEAL_LENGTH,
        format!("expected {SEAL_LENGTH} bytes, got {}", seal.len())
    );
    // recovery id must be 0 or 1
    let v = seal[SEAL_LENGTH - 1];
    ensure!(v <= 1, format!("invalid recovery id {v}"));

    let signature = Signature::try_from(seal).map_err(|e| e.to_string())?;
    signature
        .recover_address_from_prehash(digest)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        fixtures::{sealed_header, SealedHeader},
        signers::signer_addresses,
    };

    #[rstest]
    #[case(1, 0)]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(6, 4)]
    #[case(7, 4)]
    #[case(10, 6)]
    fn threshold_is_floor_of_two_thirds(#[case] validators: usize, #[case] threshold: usize) {
        assert_eq!(quorum_threshold(validators), threshold);
    }

    #[rstest]
    #[case::four_accepts_three(4, 3, true)]
    #[case::four_rejects_two(4, 2, false)]
    #[case::seven_accepts_five(7, 5, true)]
    #[case::seven_rejects_four(7, 4, false)]
    #[case::single_validator(1, 1, true)]
    fn accepts_iff_more_than_two_thirds_sealed(
        #[case] validators: usize,
        #[case] sealers: usize,
        #[case] accepted: bool,
        #[values(ConsensusType::Qbft, ConsensusType::Ibft2)] consensus_type: ConsensusType,
    ) {
        let validator_set = signer_addresses(0..validators);
        let SealedHeader { header, extra } =
            sealed_header(&validator_set, &(0..sealers).collect::<Vec<_>>(), consensus_type);

        let res = verify_header_seals(&header, &extra, consensus_type);
        if accepted {
            assert_eq!(res.unwrap().matched, sealers);
        } else {
            assert_eq!(
                res,
                Err(BesuIBCError::InsufficientQuorum {
                    matched: sealers,
                    threshold: quorum_threshold(validators),
                })
            );
        }
    }

    #[test]
    fn orders_seals_by_validator_position_with_holes() {
        let validators = signer_addresses(0..4);
        // seals of A, C and D
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[0, 2, 3], ConsensusType::Qbft);

        let verified = verify_header_seals(&header, &extra, ConsensusType::Qbft).unwrap();

        assert_eq!(verified.matched, 3);
        assert_eq!(
            verified.ordered_seals,
            vec![
                Some(extra.seals[0].clone()),
                None,
                Some(extra.seals[1].clone()),
                Some(extra.seals[2].clone()),
            ]
        );
    }

    #[test]
    fn seal_order_in_the_header_does_not_matter() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[3, 0, 1], ConsensusType::Qbft);

        let verified = verify_header_seals(&header, &extra, ConsensusType::Qbft).unwrap();

        assert_eq!(verified.ordered_seals.len(), 4);
        assert_eq!(verified.ordered_seals[0], Some(extra.seals[1].clone()));
        assert_eq!(verified.ordered_seals[1], Some(extra.seals[2].clone()));
        assert_eq!(verified.ordered_seals[2], None);
        assert_eq!(verified.ordered_seals[3], Some(extra.seals[0].clone()));
    }

    #[test]
    fn rejects_two_of_four() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[0, 1], ConsensusType::Qbft);

        assert_eq!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::InsufficientQuorum {
                matched: 2,
                threshold: 2
            })
        );
    }

    #[test]
    fn returns_the_seal_stripped_header() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[0, 1, 2, 3], ConsensusType::Ibft2);

        let verified = verify_header_seals(&header, &extra, ConsensusType::Ibft2).unwrap();

        let decoded = crate::canonical::decode_header_rlp(&verified.header_rlp).unwrap();
        assert_eq!(decoded.extra_data, extra.encode(ConsensusType::Ibft2));
        assert_eq!(decoded.number, header.number);
    }

    #[test]
    fn wrong_consensus_type_does_not_reach_quorum() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[0, 1, 2, 3], ConsensusType::Ibft2);

        // the seals recover to unrelated addresses against the QBFT pre-image
        assert_eq!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::InsufficientQuorum {
                matched: 0,
                threshold: 2
            })
        );
    }

    #[test]
    fn duplicate_seals_count_once() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, mut extra } =
            sealed_header(&validators, &[0, 1], ConsensusType::Qbft);
        extra.seals.push(extra.seals[0].clone());

        assert_eq!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::InsufficientQuorum {
                matched: 2,
                threshold: 2
            })
        );
    }

    #[test]
    fn seals_from_non_validators_are_ignored() {
        let validators = signer_addresses(0..4);
        // signer 5 is not part of the validator set
        let SealedHeader { header, extra } =
            sealed_header(&validators, &[0, 1, 5], ConsensusType::Qbft);

        let res = verify_header_seals(&header, &extra, ConsensusType::Qbft);
        assert_eq!(
            res,
            Err(BesuIBCError::InsufficientQuorum {
                matched: 2,
                threshold: 2
            })
        );
    }

    #[test]
    fn malformed_seal_fails_the_whole_check() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, mut extra } =
            sealed_header(&validators, &[0, 1, 2, 3], ConsensusType::Qbft);
        extra.seals[2] = Bytes::from(vec![0x01; 64]);

        assert!(matches!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::SealRecovery { index: 2, .. })
        ));
    }

    #[rstest]
    #[case(27)]
    #[case(28)]
    #[case(37)]
    #[case(4)]
    fn legacy_recovery_ids_fail_the_whole_check(#[case] offset: u8) {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, mut extra } =
            sealed_header(&validators, &[0, 1, 2], ConsensusType::Qbft);
        for seal in &mut extra.seals {
            let mut raw = seal.to_vec();
            raw[SEAL_LENGTH - 1] += offset;
            *seal = raw.into();
        }

        assert!(matches!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::SealRecovery { index: 0, .. })
        ));
    }

    #[test]
    fn oversized_seal_fails_the_whole_check() {
        let validators = signer_addresses(0..4);
        let SealedHeader { header, mut extra } =
            sealed_header(&validators, &[0, 1, 2, 3], ConsensusType::Qbft);
        let mut raw = extra.seals[1].to_vec();
        raw.push(0);
        extra.seals[1] = raw.into();

        assert!(matches!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::SealRecovery { index: 1, .. })
        ));
    }

    #[test]
    fn empty_validator_set_never_reaches_quorum() {
        let SealedHeader { header, extra } = sealed_header(&[], &[], ConsensusType::Qbft);

        assert_eq!(
            verify_header_seals(&header, &extra, ConsensusType::Qbft),
            Err(BesuIBCError::InsufficientQuorum {
                matched: 0,
                threshold: 0
            })
        );
    }
}
