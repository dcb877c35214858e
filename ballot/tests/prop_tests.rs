use proptest::prelude::*;

use svote_admin::PermissionStore;
use svote_ballot::{
    AuthMode, Ballot, BallotError, PackedField, SequenceGuard, SubmissionFlags, MAX_SEQUENCE,
};
use svote_types::{BallotId, Namespace, Principal, SpecHash, Timestamp};

const ETH_NO_ENC: u128 = (SubmissionFlags::USE_ETH | SubmissionFlags::USE_NO_ENC) as u128;

fn open_ballot() -> Ballot {
    Ballot::create(
        BallotId::compose(Namespace(1), 1).unwrap(),
        SpecHash::new([1u8; 32]),
        PackedField::encode(0, 1_000_000, ETH_NO_ENC),
        Principal::new("sv_owner"),
        None,
        vec![],
        Timestamp::new(0),
    )
    .unwrap()
}

fn expected_legal(bits: u16) -> bool {
    let eth = bits & SubmissionFlags::USE_ETH != 0;
    let signed = bits & SubmissionFlags::USE_SIGNED != 0;
    let no_enc = bits & SubmissionFlags::USE_NO_ENC != 0;
    let enc = bits & SubmissionFlags::USE_ENC != 0;
    eth != signed && no_enc != enc && bits & !SubmissionFlags::KNOWN_BITS == 0
}

proptest! {
    /// Creation succeeds iff exactly one auth bit, exactly one enc bit and no unknown bit.
    #[test]
    fn flag_legality(bits in any::<u16>()) {
        let result = SubmissionFlags::validate(bits as u128);
        prop_assert_eq!(result.is_ok(), expected_legal(bits));
    }

    /// The packed word decodes back to its parts for every input.
    #[test]
    fn packed_fields_recovered(start in any::<u64>(), end in any::<u64>(), flags in any::<u128>()) {
        let packed = PackedField::encode(start, end, flags);
        prop_assert_eq!(packed.decode(), (start, end, flags));
        prop_assert_eq!(PackedField::from_be_bytes(&packed.to_be_bytes()), packed);
    }

    /// Creation with end <= start always fails.
    #[test]
    fn end_before_start_fails(start in 1u64..u32::MAX as u64, back in 0u64..1000) {
        let end = start.saturating_sub(back);
        let result = Ballot::create(
            BallotId::compose(Namespace(1), 1).unwrap(),
            SpecHash::new([1u8; 32]),
            PackedField::encode(start, end, ETH_NO_ENC),
            Principal::new("sv_owner"),
            None,
            vec![],
            Timestamp::new(0),
        );
        let is_invalid_timing = matches!(result, Err(BallotError::InvalidTiming { .. }));
        prop_assert!(is_invalid_timing);
    }

    /// n votes on an open ballot get indices 0..n in call order and re-read identically.
    #[test]
    fn vote_indices_sequential(payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 1..20)) {
        let mut ballot = open_ballot();
        for (i, data) in payloads.iter().enumerate() {
            let idx = ballot
                .submit_direct(AuthMode::Eth, &Principal::new("sv_voter"), data.clone(), vec![], Timestamp::new(i as u64 + 1))
                .unwrap();
            prop_assert_eq!(idx, i as u64);
        }
        for (i, data) in payloads.iter().enumerate() {
            let first = ballot.vote(i as u64).cloned();
            let second = ballot.vote(i as u64).cloned();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first.unwrap().data, data);
        }
    }

    /// A relayed sequence is accepted iff it is strictly above the stored one
    /// and inside the 32-bit domain.
    #[test]
    fn proxy_sequence_monotonic(stored in 0u32..u32::MAX, offered in any::<u64>()) {
        let signer = Principal::new("sv_signer");
        let mut guard = SequenceGuard::new();
        guard.record(&signer, stored);
        let result = guard.check(&signer, offered);
        let expect_ok = offered > stored as u64 && offered <= u32::MAX as u64;
        prop_assert_eq!(result.is_ok(), expect_ok);
    }

    /// After a direct vote no relayed vote from the same signer is accepted.
    #[test]
    fn direct_vote_blocks_every_proxy(offered in any::<u64>()) {
        let mut ballot = open_ballot();
        let signer = Principal::new("sv_signer");
        ballot.submit_direct(AuthMode::Eth, &signer, vec![1], vec![], Timestamp::new(1)).unwrap();
        prop_assert_eq!(ballot.sequence_of(&signer), MAX_SEQUENCE);
        prop_assert!(ballot.submit_proxy(&signer, offered, vec![2], vec![], Timestamp::new(2)).is_err());
    }

    /// Deprecation blocks votes at every later time.
    #[test]
    fn deprecation_terminal(at in 0u64..2_000_000) {
        let mut ballot = open_ballot();
        let admins = PermissionStore::new(Principal::new("sv_farm"));
        ballot.set_deprecated(&Principal::new("sv_owner"), &admins).unwrap();
        let result = ballot.submit_direct(AuthMode::Eth, &Principal::new("sv_voter"), vec![], vec![], Timestamp::new(at));
        let is_closed = matches!(result, Err(BallotError::BallotClosed(_)));
        prop_assert!(is_closed);
    }

    /// Only the exact USE_ETH|USE_NO_ENC word qualifies as community.
    #[test]
    fn community_classification(bits in any::<u16>()) {
        if let Ok(flags) = SubmissionFlags::validate(bits as u128) {
            prop_assert_eq!(flags.qualifies_as_community(), bits == SubmissionFlags::COMMUNITY);
        }
    }

    /// Arbitrary byte strings survive the RLP list encoding.
    #[test]
    fn rlp_lists_decode(items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..80), 0..10)) {
        let encoded = svote_ballot::rlp::encode_list(&items);
        prop_assert_eq!(svote_ballot::rlp::decode_list(&encoded).unwrap(), items);
    }
}
