use proptest::prelude::*;

use svote_types::{BallotId, Namespace, SpecHash, Timestamp, Wei};

proptest! {
    /// Namespace and sequence are recovered from a composed id.
    #[test]
    fn ballot_id_fields_recovered(ns in any::<u32>(), seq in 1u128..(1u128 << 96)) {
        let id = BallotId::compose(Namespace(ns), seq).unwrap();
        prop_assert_eq!(id.namespace(), Namespace(ns));
        prop_assert_eq!(id.sequence(), seq);
    }

    /// Ids from different namespaces never collide.
    #[test]
    fn ballot_ids_disjoint_across_namespaces(a in any::<u32>(), b in any::<u32>(), seq in 1u128..1_000_000) {
        prop_assume!(a != b);
        let x = BallotId::compose(Namespace(a), seq).unwrap();
        let y = BallotId::compose(Namespace(b), seq).unwrap();
        prop_assert_ne!(x, y);
    }

    /// SpecHash::is_zero is true only for all-zero bytes.
    #[test]
    fn spec_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(SpecHash::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// Summing wei never panics and matches checked addition when it fits.
    #[test]
    fn wei_sum_matches_checked_add(a in 0u128..u64::MAX as u128, b in 0u128..u64::MAX as u128) {
        let total: Wei = [Wei::new(a), Wei::new(b)].into_iter().sum();
        prop_assert_eq!(Some(total), Wei::new(a).checked_add(Wei::new(b)));
    }

    /// elapsed_since and secs_until are mirror images.
    #[test]
    fn elapsed_and_until_mirror(a in 0u64..u32::MAX as u64, b in 0u64..u32::MAX as u64) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta.elapsed_since(tb), tb.secs_until(ta));
    }
}
