//! Behavioural tests for the ballot farm and its remote variants.

use std::sync::{Arc, Mutex};

use svote_admin::PermissionStore;
use svote_ballot::{BallotError, BallotState, PackedField, SubmissionFlags, SubmissionMode, MAX_SEQUENCE};
use svote_crypto::{derive_principal, keypair_from_seed, Ed25519Verifier};
use svote_farm::{
    BallotFarm, FarmError, FarmEvent, ProxyVoteRequest, RemoteVoteFarm, SignedBallotInit, SignedVote,
    VotingNetworkDetails,
};
use svote_nullables::{NullBank, NullClock, NullVerifier};
use svote_types::{BallotId, EncSeckey, Namespace, Principal, SpecHash, Timestamp, TransferError, Wei};

const NS: Namespace = Namespace(0x0000_0001);
const ETH: u16 = SubmissionFlags::USE_ETH;
const SIGNED: u16 = SubmissionFlags::USE_SIGNED;
const NO_ENC: u16 = SubmissionFlags::USE_NO_ENC;
const ENC: u16 = SubmissionFlags::USE_ENC;
const TESTING: u16 = SubmissionFlags::USE_TESTING;

fn p(name: &str) -> Principal {
    Principal::new(format!("sv_{name}"))
}

fn spec(n: u8) -> SpecHash {
    SpecHash::new([n; 32])
}

fn packed(start: u64, end: u64, flags: u16) -> PackedField {
    PackedField::encode(start, end, flags as u128)
}

fn farm() -> BallotFarm {
    let mut perms = PermissionStore::new(p("owner"));
    perms.set_permission(&p("owner"), &p("index"), true).unwrap();
    BallotFarm::new(NS, perms, Box::new(Ed25519Verifier))
}

/// Farm with one open ballot from t=1000 to t=1600.
fn farm_with_ballot(flags: u16) -> (BallotFarm, BallotId, NullClock) {
    let clock = NullClock::new(1000);
    let mut farm = farm();
    let id = farm
        .init_ballot(&p("index"), spec(1), packed(999, 1600, flags), Some(p("editor")), vec![], clock.now())
        .unwrap();
    (farm, id, clock)
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[test]
fn init_ballot_assigns_dense_ids_in_namespace() {
    let mut farm = farm();
    let now = Timestamp::new(10);
    let a = farm.init_ballot(&p("index"), spec(1), packed(0, 100, ETH | NO_ENC), None, vec![], now).unwrap();
    let b = farm.init_ballot(&p("index"), spec(2), packed(0, 100, ETH | NO_ENC), None, vec![], now).unwrap();

    assert_eq!(a.namespace(), NS);
    assert_eq!(a.sequence(), 1);
    assert_eq!(b.sequence(), 2);
    assert_eq!(farm.n_ballots(), 2);
    assert_eq!(farm.details(a, None).unwrap().owner, p("index"));
    assert_eq!(farm.creation_ts(b).unwrap(), now);
}

#[test]
fn init_ballot_requires_permission() {
    let mut farm = farm();
    let err = farm
        .init_ballot(&p("stranger"), spec(1), packed(0, 100, ETH | NO_ENC), None, vec![], Timestamp::new(1))
        .unwrap_err();
    assert!(matches!(err, FarmError::Admin(_)));
    assert_eq!(farm.n_ballots(), 0);
}

#[test]
fn creation_validation_errors() {
    let mut farm = farm();
    let now = Timestamp::new(50);
    let mut init = |hash: SpecHash, pk: PackedField| {
        farm.init_ballot(&p("index"), hash, pk, None, vec![], now)
    };

    assert_eq!(
        init(SpecHash::ZERO, packed(0, 100, ETH | NO_ENC)),
        Err(FarmError::Ballot(BallotError::ZeroSpecHash))
    );
    assert_eq!(
        init(spec(1), packed(0, 100, ETH | SIGNED)),
        Err(FarmError::Ballot(BallotError::InvalidFlags(3)))
    );
    assert!(matches!(
        init(spec(1), packed(100, 100, ETH | NO_ENC)),
        Err(FarmError::Ballot(BallotError::InvalidTiming { .. }))
    ));
    assert!(matches!(
        init(spec(1), packed(0, 40, ETH | NO_ENC)),
        Err(FarmError::Ballot(BallotError::InvalidTiming { .. }))
    ));
    assert!(init(spec(1), packed(0, 100, ETH | NO_ENC)).is_ok());
    assert_eq!(
        init(spec(1), packed(0, 200, ETH | ENC)),
        Err(FarmError::Ballot(BallotError::DuplicateSpecHash(spec(1))))
    );
}

#[test]
fn future_start_is_pending() {
    let mut farm = farm();
    let id = farm
        .init_ballot(&p("index"), spec(1), packed(500, 900, ETH | NO_ENC), None, vec![], Timestamp::new(100))
        .unwrap();
    let ballot = farm.ballot(id).unwrap();
    assert_eq!(ballot.state(Timestamp::new(499)), BallotState::Pending);
    assert_eq!(ballot.state(Timestamp::new(500)), BallotState::Open);
}

#[test]
fn foreign_namespace_and_unknown_sequence_rejected() {
    let (farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    let foreign = BallotId::compose(Namespace(2), id.sequence()).unwrap();
    assert!(matches!(
        farm.details(foreign, None),
        Err(FarmError::WrongNamespace { .. })
    ));
    let missing = BallotId::compose(NS, 2).unwrap();
    assert_eq!(farm.details(missing, None), Err(FarmError::UnknownBallot(missing)));
    assert_eq!(
        farm.details(BallotId::from_raw(0), None),
        Err(FarmError::WrongNamespace {
            id: BallotId::from_raw(0),
            expected: NS,
            got: Namespace(0)
        })
    );
}

#[test]
fn init_ballot_proxy_makes_signer_owner() {
    let mut farm = farm();
    let keys = keypair_from_seed(&[5u8; 32]);
    let req = SignedBallotInit::sign(&keys, NS, spec(9), packed(0, 100, ETH | NO_ENC), vec![1, 2]);

    let id = farm.init_ballot_proxy(&p("index"), &req, Timestamp::new(1)).unwrap();
    let details = farm.details(id, None).unwrap();
    assert_eq!(details.owner, derive_principal(&keys.public));
    assert_eq!(details.extra, vec![1, 2]);

    let other_ns = SignedBallotInit::sign(&keys, Namespace(7), spec(10), packed(0, 100, ETH | NO_ENC), vec![]);
    assert_eq!(
        farm.init_ballot_proxy(&p("index"), &other_ns, Timestamp::new(1)),
        Err(FarmError::InvalidSignature)
    );
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[test]
fn eth_votes_read_back() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    assert_eq!(farm.submit_vote(id, &p("u1"), b"yes".to_vec(), vec![], clock.now()).unwrap(), 0);
    clock.advance(5);
    assert_eq!(farm.submit_vote(id, &p("u2"), b"no".to_vec(), vec![7], clock.now()).unwrap(), 1);

    let (data, voter, extra) = farm.get_vote(id, 1).unwrap();
    assert_eq!(data, b"no");
    assert_eq!(voter, &p("u2"));
    assert_eq!(extra, &[7]);

    let vote = farm.get_vote_and_time(id, 0).unwrap();
    assert_eq!(vote.cast_at, Timestamp::new(1000));
    assert_eq!(vote.extra, Vec::<u8>::new());
    assert_eq!(farm.get_vote(id, 2), Err(FarmError::UnknownVote { id, index: 2 }));

    let details = farm.details(id, Some(&p("u1"))).unwrap();
    assert_eq!(details.n_votes, 2);
    assert!(details.has_voted);
    assert!(!farm.details(id, Some(&p("u3"))).unwrap().has_voted);
}

#[test]
fn votes_between_for_filters_by_voter() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    for (who, dt) in [("a", 0), ("b", 10), ("a", 10), ("b", 10)] {
        clock.advance(dt);
        farm.submit_vote(id, &p(who), vec![], vec![], clock.now()).unwrap();
    }
    let all = farm.votes_between(id, Timestamp::new(1000), Timestamp::new(1030)).unwrap();
    assert_eq!(all.ids, vec![0, 1, 2, 3]);
    let window = farm.votes_between(id, Timestamp::new(1010), Timestamp::new(1020)).unwrap();
    assert_eq!(window.ids, vec![1, 2]);
    let for_a = farm
        .votes_between_for(id, Timestamp::new(0), Timestamp::new(5000), &p("a"))
        .unwrap();
    assert_eq!(for_a.ids, vec![0, 2]);
    assert_eq!(for_a.voters, vec![p("a"), p("a")]);
}

#[test]
fn signed_enc_ballot_rejects_eth_path_and_accepts_signature() {
    let clock = NullClock::new(10_000);
    let mut farm = farm();
    let now = clock.now();
    let id = farm
        .init_ballot(
            &p("index"),
            spec(1),
            packed(now.as_secs() - 1, now.as_secs() + 600, SIGNED | ENC | TESTING),
            None,
            vec![],
            now,
        )
        .unwrap();

    assert_eq!(
        farm.submit_vote(id, &p("u1"), vec![1], vec![2; 32], now),
        Err(FarmError::Ballot(BallotError::ModeMismatch(SubmissionMode::EthWithEnc)))
    );

    let keys = keypair_from_seed(&[8u8; 32]);
    let vote = SignedVote::sign(&keys, id, vec![1], vec![2; 32]);
    assert_eq!(farm.submit_signed_vote(id, &vote, now).unwrap(), 0);
    let (_, voter, _) = farm.get_vote(id, 0).unwrap();
    assert_eq!(voter, &derive_principal(&keys.public));

    let mut forged = vote.clone();
    forged.vote = vec![9];
    assert_eq!(farm.submit_signed_vote(id, &forged, now), Err(FarmError::InvalidSignature));
}

#[test]
fn signed_vote_counts_once_whoever_relays_it() {
    let (mut farm, id, clock) = farm_with_ballot(SIGNED | NO_ENC);
    let keys = keypair_from_seed(&[8u8; 32]);
    let voter = derive_principal(&keys.public);
    let vote = SignedVote::sign(&keys, id, vec![1], vec![]);

    assert_eq!(farm.submit_signed_vote(id, &vote, clock.now()), Ok(0));
    assert_eq!(
        farm.submit_signed_vote(id, &vote, clock.now()),
        Err(FarmError::Ballot(BallotError::SignedVoteReplayed(voter.clone())))
    );
    let second = SignedVote::sign(&keys, id, vec![2], vec![]);
    assert_eq!(
        farm.submit_signed_vote(id, &second, clock.now()),
        Err(FarmError::Ballot(BallotError::SignedVoteReplayed(voter)))
    );
    assert_eq!(farm.details(id, None).unwrap().n_votes, 1);
}

#[test]
fn signed_path_on_eth_ballot_is_mismatch() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    let keys = keypair_from_seed(&[8u8; 32]);
    let vote = SignedVote::sign(&keys, id, vec![1], vec![]);
    assert_eq!(
        farm.submit_signed_vote(id, &vote, clock.now()),
        Err(FarmError::Ballot(BallotError::ModeMismatch(SubmissionMode::SignedNoEnc)))
    );
}

#[test]
fn proxy_sequence_rules() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    let keys = keypair_from_seed(&[2u8; 32]);
    let signer = derive_principal(&keys.public);
    let now = clock.now();
    let mut relay = |seq: u64| {
        let req = ProxyVoteRequest::sign(&keys, id, seq, vec![seq as u8]);
        farm.submit_proxy_vote(&req, vec![], now)
    };

    assert_eq!(relay(1), Ok(0));
    assert_eq!(relay(3), Ok(1));
    assert_eq!(
        relay(1),
        Err(FarmError::Ballot(BallotError::StaleSequence { stored: 3, offered: 1 }))
    );
    assert!(relay(2).is_err());
    assert_eq!(relay(0xffff_ffff), Ok(2));
    assert_eq!(
        relay(0x1_0000_0000),
        Err(FarmError::Ballot(BallotError::SequenceOverflow(0x1_0000_0000)))
    );
    assert_eq!(farm.get_sequence_number(id, &signer).unwrap(), MAX_SEQUENCE);
}

#[test]
fn direct_votes_repeat_and_pin_sequence() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    let keys = keypair_from_seed(&[3u8; 32]);
    let u1 = derive_principal(&keys.public);

    assert_eq!(farm.get_sequence_number(id, &u1).unwrap(), 0);
    farm.submit_vote(id, &u1, vec![1], vec![], clock.now()).unwrap();
    farm.submit_vote(id, &u1, vec![2], vec![], clock.now()).unwrap();
    assert_eq!(farm.get_sequence_number(id, &u1).unwrap(), MAX_SEQUENCE);

    let req = ProxyVoteRequest::sign(&keys, id, 1, vec![3]);
    assert!(farm.submit_proxy_vote(&req, vec![], clock.now()).is_err());
    assert_eq!(farm.details(id, None).unwrap().n_votes, 2);
}

#[test]
fn proxy_vote_with_bad_signature_rejected() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    let keys = keypair_from_seed(&[2u8; 32]);
    let mut req = ProxyVoteRequest::sign(&keys, id, 1, vec![1]);
    req.sequence = 2;
    assert_eq!(
        farm.submit_proxy_vote(&req, vec![], clock.now()),
        Err(FarmError::InvalidSignature)
    );
}

#[test]
fn injected_verifier_decides_signatures() {
    let mut perms = PermissionStore::new(p("owner"));
    perms.set_permission(&p("owner"), &p("index"), true).unwrap();
    let mut farm = BallotFarm::new(NS, perms, Box::new(NullVerifier::rejecting()));
    let now = Timestamp::new(10);
    let id = farm
        .init_ballot(&p("index"), spec(1), packed(0, 100, ETH | NO_ENC), None, vec![], now)
        .unwrap();
    let keys = keypair_from_seed(&[2u8; 32]);
    let req = ProxyVoteRequest::sign(&keys, id, 1, vec![1]);
    assert_eq!(farm.submit_proxy_vote(&req, vec![], now), Err(FarmError::InvalidSignature));
}

#[test]
fn closed_ballot_rejects_votes() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    clock.set(1600);
    assert_eq!(
        farm.submit_vote(id, &p("u1"), vec![], vec![], clock.now()),
        Err(FarmError::Ballot(BallotError::BallotClosed(BallotState::Closed)))
    );
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

#[test]
fn deprecation_blocks_votes_forever() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    assert!(matches!(
        farm.set_deprecated(id, &p("u1")),
        Err(FarmError::Ballot(BallotError::Forbidden(_)))
    ));
    farm.set_deprecated(id, &p("editor")).unwrap();
    for t in [1000, 1500, 99_999] {
        clock.set(t);
        assert!(farm.submit_vote(id, &p("u1"), vec![], vec![], clock.now()).is_err());
    }
    assert!(farm.details(id, None).unwrap().deprecated);
}

#[test]
fn farm_admin_can_act_on_any_ballot() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC | TESTING);
    farm.set_end_time(id, &p("owner"), Timestamp::new(1100)).unwrap();
    assert_eq!(farm.details(id, None).unwrap().end, Timestamp::new(1100));
    farm.set_deprecated(id, &p("owner")).unwrap();
}

#[test]
fn ownership_transfer() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    assert!(farm.set_ballot_owner(id, &p("owner"), p("x")).is_err());
    farm.set_ballot_owner(id, &p("editor"), p("x")).unwrap();
    assert_eq!(farm.details(id, None).unwrap().owner, p("x"));
}

#[test]
fn end_time_and_seckey_flow() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | ENC | TESTING);
    let key = EncSeckey::new([0x42; 32]);

    assert_eq!(
        farm.reveal_seckey(id, &p("editor"), key, clock.now()),
        Err(FarmError::Ballot(BallotError::EarlySeckeyReveal))
    );
    farm.set_end_time(id, &p("editor"), Timestamp::new(0)).unwrap();
    farm.reveal_seckey(id, &p("editor"), key, clock.now()).unwrap();
    assert_eq!(farm.details(id, None).unwrap().enc_seckey, key);
    assert_eq!(
        farm.reveal_seckey(id, &p("editor"), key, clock.now()),
        Err(FarmError::Ballot(BallotError::SeckeyAlreadyRevealed))
    );
}

#[test]
fn set_end_time_needs_testing_flag() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    assert_eq!(
        farm.set_end_time(id, &p("editor"), Timestamp::new(0)),
        Err(FarmError::Ballot(BallotError::TestingRequired))
    );
}

// ---------------------------------------------------------------------------
// Sponsorship
// ---------------------------------------------------------------------------

#[test]
fn sponsorship_forwards_to_payee() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    farm.set_payee(&p("owner"), p("treasury")).unwrap();
    let mut bank = NullBank::new()
        .with_balance(&p("s1"), Wei::new(5000))
        .with_balance(&p("s2"), Wei::new(5000));

    farm.sponsor(id, &p("s1"), Wei::new(1000), &mut bank).unwrap();
    farm.sponsor(id, &p("s2"), Wei::new(1337), &mut bank).unwrap();

    assert_eq!(farm.total_sponsorship(id).unwrap(), Wei::new(2337));
    assert_eq!(farm.sponsors_n(id).unwrap(), 2);
    assert_eq!(farm.get_sponsor(id, 1).unwrap(), (&p("s2"), Wei::new(1337)));
    assert_eq!(bank.balance(&p("treasury")), Wei::new(2337));
    assert!(farm.get_sponsor(id, 2).is_err());
}

#[test]
fn failed_forward_reverts_sponsorship() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    farm.set_payee(&p("owner"), p("treasury")).unwrap();
    let mut bank = NullBank::new().with_balance(&p("s1"), Wei::new(5000));
    bank.reject_transfers_to(&p("treasury"));

    assert_eq!(
        farm.sponsor(id, &p("s1"), Wei::new(1999), &mut bank),
        Err(FarmError::Transfer(TransferError::Rejected(p("treasury"))))
    );
    assert_eq!(farm.sponsors_n(id).unwrap(), 0);
    assert_eq!(farm.total_sponsorship(id).unwrap(), Wei::ZERO);
    assert_eq!(bank.balance(&p("s1")), Wei::new(5000));
}

#[test]
fn zero_sponsorship_rejected() {
    let (mut farm, id, _) = farm_with_ballot(ETH | NO_ENC);
    let mut bank = NullBank::new();
    assert_eq!(
        farm.sponsor(id, &p("s1"), Wei::ZERO, &mut bank),
        Err(FarmError::ZeroSponsorship)
    );
}

#[test]
fn only_admin_sets_payee() {
    let mut farm = farm();
    assert_eq!(farm.payee(), &p("owner"));
    assert!(farm.set_payee(&p("index"), p("x")).is_err());
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[test]
fn events_follow_state_changes() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut farm = farm();
    let sink = Arc::clone(&seen);
    farm.subscribe(Box::new(move |e: &FarmEvent| sink.lock().unwrap().push(e.clone())));

    let now = Timestamp::new(5);
    let id = farm
        .init_ballot(&p("index"), spec(1), packed(0, 100, ETH | NO_ENC), None, vec![], now)
        .unwrap();
    farm.submit_vote(id, &p("u1"), vec![], vec![], now).unwrap();
    assert!(farm.submit_vote(id, &p("u1"), vec![], vec![], Timestamp::new(100)).is_err());

    let events = seen.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            FarmEvent::BallotCreated { id, owner: p("index") },
            FarmEvent::VoteCast { id, index: 0, voter: p("u1") },
        ]
    );
}

// ---------------------------------------------------------------------------
// Remote farms
// ---------------------------------------------------------------------------

fn remote_details() -> VotingNetworkDetails {
    VotingNetworkDetails {
        network_id: 1,
        chain_id: 61,
        remote_farm: p("remote_farm"),
    }
}

#[test]
fn remote_host_keeps_metadata_and_refuses_votes() {
    let ns = Namespace(0x0161_0001);
    let mut perms = PermissionStore::new(p("owner"));
    perms.set_permission(&p("owner"), &p("index"), true).unwrap();
    let mut host = BallotFarm::remote_host(ns, perms, Box::new(Ed25519Verifier), remote_details());
    let now = Timestamp::new(10);

    assert_eq!(host.voting_network_details(), Some(&remote_details()));
    let id = host
        .init_ballot(&p("index"), spec(1), packed(0, 100, ETH | ENC | TESTING), None, vec![], now)
        .unwrap();
    assert_eq!(id.namespace(), ns);

    let unsupported = |r: Result<u64, FarmError>| matches!(r, Err(FarmError::Unsupported(_)));
    assert!(unsupported(host.submit_vote(id, &p("u1"), vec![], vec![], now)));
    let keys = keypair_from_seed(&[1u8; 32]);
    assert!(unsupported(host.submit_proxy_vote(&ProxyVoteRequest::sign(&keys, id, 1, vec![]), vec![], now)));
    assert!(host.get_vote_and_time(id, 0).is_err());
    assert!(host.get_sequence_number(id, &p("u1")).is_err());
    assert!(host.total_sponsorship(id).is_err());
    let mut bank = NullBank::new().with_balance(&p("s"), Wei::new(10));
    assert_eq!(
        host.sponsor(id, &p("s"), Wei::new(1), &mut bank),
        Err(FarmError::Unsupported("sponsor"))
    );

    host.set_end_time(id, &p("index"), Timestamp::new(0)).unwrap();
    host.reveal_seckey(id, &p("index"), EncSeckey::new([1; 32]), now).unwrap();
    host.set_ballot_owner(id, &p("index"), p("x")).unwrap();
    host.set_deprecated(id, &p("x")).unwrap();
}

#[test]
fn remote_vote_farm_takes_votes_only() {
    let ns = Namespace(0x0161_0001);
    let mut remote = RemoteVoteFarm::new(ns, p("remote_farm"), Box::new(Ed25519Verifier));
    let id = BallotId::compose(ns, 1).unwrap();
    let now = Timestamp::new(77);

    assert_eq!(remote.voting_network_details().remote_farm, p("remote_farm"));
    assert_eq!(remote.voting_network_details().network_id, 0);

    assert_eq!(remote.submit_vote(id, &p("u1"), vec![1], vec![], now), Ok(0));
    let keys = keypair_from_seed(&[6u8; 32]);
    assert_eq!(remote.submit_proxy_vote(&ProxyVoteRequest::sign(&keys, id, 1, vec![2]), vec![], now), Ok(1));
    assert!(remote
        .submit_proxy_vote(&ProxyVoteRequest::sign(&keys, id, 1, vec![2]), vec![], now)
        .is_err());

    assert_eq!(remote.n_votes(id).unwrap(), 2);
    assert_eq!(remote.get_vote_and_time(id, 1).unwrap().cast_at, now);
    assert_eq!(remote.get_sequence_number(id, &p("u1")).unwrap(), MAX_SEQUENCE);

    assert_eq!(remote.get_vote(id, 0), Err(FarmError::Unsupported("get_vote")));
    assert!(remote.init_ballot(&p("u1"), spec(1)).is_err());
    assert!(remote.set_ballot_owner(id, &p("u1"), p("x")).is_err());
    assert!(remote.set_deprecated(id, &p("u1")).is_err());
    assert!(remote.set_end_time(id, &p("u1"), now).is_err());
    assert!(remote.reveal_seckey(id, &p("u1"), EncSeckey::new([1; 32])).is_err());
    assert!(remote.sponsor(id, &p("u1"), Wei::new(1)).is_err());

    let foreign = BallotId::compose(Namespace(1), 1).unwrap();
    assert!(matches!(
        remote.submit_vote(foreign, &p("u1"), vec![], vec![], now),
        Err(FarmError::WrongNamespace { .. })
    ));
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[test]
fn exported_state_restores_into_new_farm() {
    let (mut farm, id, clock) = farm_with_ballot(ETH | NO_ENC);
    farm.submit_vote(id, &p("u1"), b"v".to_vec(), vec![], clock.now()).unwrap();
    let bytes = farm.export_state().unwrap();

    let mut perms = PermissionStore::new(p("owner"));
    perms.set_permission(&p("owner"), &p("index"), true).unwrap();
    let mut restored = BallotFarm::import_state(&bytes, perms, Box::new(Ed25519Verifier)).unwrap();

    assert_eq!(restored.n_ballots(), 1);
    assert_eq!(restored.get_vote(id, 0).unwrap().0, b"v");
    assert_eq!(restored.get_sequence_number(id, &p("u1")).unwrap(), MAX_SEQUENCE);
    assert_eq!(
        restored.init_ballot(&p("index"), spec(1), packed(0, 5000, ETH | NO_ENC), None, vec![], clock.now()),
        Err(FarmError::Ballot(BallotError::DuplicateSpecHash(spec(1))))
    );
    let next = restored
        .init_ballot(&p("index"), spec(2), packed(0, 5000, ETH | NO_ENC), None, vec![], clock.now())
        .unwrap();
    assert_eq!(next.sequence(), 2);
}

#[test]
fn garbage_snapshot_rejected() {
    let perms = PermissionStore::new(p("owner"));
    assert!(matches!(
        BallotFarm::import_state(&[1, 2, 3], perms, Box::new(Ed25519Verifier)),
        Err(FarmError::Snapshot(_))
    ));
}
