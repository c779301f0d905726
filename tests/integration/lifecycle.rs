use crate::integration::support::{memory_ledger, MIN_STAKE};
use reputation_ledger::types::MIN_DECAY_INTERVAL;
use reputation_ledger::{ErrorCategory, Identity, LedgerError};

#[test]
fn stake_weighted_walkthrough() {
    let ledger = memory_ledger();

    let a = ledger.register("A");
    let profile = ledger.engine.query_reputation(&a).unwrap().unwrap();
    assert_eq!(profile.reputation_score, 1_000);
    assert_eq!(profile.task_count, 0);

    let profile = ledger.engine.complete_task(&a, "t1", "").unwrap();
    assert_eq!(profile.reputation_score, 1_100);
    assert_eq!(profile.task_count, 1);

    let b = ledger.register_funded("B", 2 * MIN_STAKE);
    let receipt = ledger.engine.vouch(&b, &a, 2 * MIN_STAKE, true).unwrap();
    assert_eq!(receipt.record.score_delta, 2);
    assert_eq!(receipt.target.positive_vouches, 1);
    assert_eq!(receipt.target.vouch_count, 1);
    assert_eq!(receipt.target.staked_amount, 2 * MIN_STAKE);
    assert_eq!(receipt.target.reputation_score, 1_102);

    ledger.clock.advance(MIN_DECAY_INTERVAL);
    let profile = ledger.engine.decay(&b, &a).unwrap();
    assert_eq!(profile.reputation_score, 1_092);

    let err = ledger.engine.complete_task(&a, "t1", "").unwrap_err();
    assert!(matches!(err, LedgerError::TaskAlreadyComplete(_)));
    assert_eq!(err.category(), ErrorCategory::Conflict);
    let after = ledger.engine.query_reputation(&a).unwrap().unwrap();
    assert_eq!(after, profile);
}

#[test]
fn second_registration_fails_and_keeps_first_profile() {
    let ledger = memory_ledger();
    let alice = Identity::from_label("alice");
    let first = ledger
        .engine
        .register_agent(&alice, "alice", "ipfs://first")
        .unwrap();

    ledger.clock.advance(10);
    let err = ledger
        .engine
        .register_agent(&alice, "imposter", "ipfs://second")
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRegistered(_)));
    assert_eq!(err.code(), Some(6001));

    let stored = ledger.engine.query_reputation(&alice).unwrap().unwrap();
    assert_eq!(stored, first);
    assert_eq!(ledger.engine.config().unwrap().unwrap().total_agents, 1);
}

#[test]
fn decay_twice_within_interval_leaves_score() {
    let ledger = memory_ledger();
    let alice = ledger.register("alice");

    ledger.clock.advance(MIN_DECAY_INTERVAL);
    assert_eq!(ledger.engine.decay(&alice, &alice).unwrap().reputation_score, 990);

    ledger.clock.advance(MIN_DECAY_INTERVAL - 1);
    let err = ledger.engine.decay(&alice, &alice).unwrap_err();
    match err {
        LedgerError::DecayTooSoon { remaining_secs } => assert_eq!(remaining_secs, 1),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ledger.score(&alice), 990);
}

#[test]
fn task_completion_resets_decay_timer() {
    let ledger = memory_ledger();
    let alice = ledger.register("alice");

    ledger.clock.advance(MIN_DECAY_INTERVAL - 5);
    ledger.engine.complete_task(&alice, "t1", "").unwrap();
    ledger.clock.advance(10);
    assert!(matches!(
        ledger.engine.decay(&alice, &alice),
        Err(LedgerError::DecayTooSoon { .. })
    ));
}

#[test]
fn unregistered_identity_is_absent_not_an_error() {
    let ledger = memory_ledger();
    let ghost = Identity::from_label("ghost");
    assert!(ledger.engine.query_reputation(&ghost).unwrap().is_none());
    assert!(matches!(
        ledger.engine.complete_task(&ghost, "t1", ""),
        Err(LedgerError::NotRegistered(_))
    ));
    assert!(matches!(
        ledger.engine.decay(&ghost, &ghost),
        Err(LedgerError::NotRegistered(_))
    ));
}

#[test]
fn initialize_is_one_shot() {
    let ledger = memory_ledger();
    let err = ledger
        .engine
        .initialize(&Identity::from_label("usurper"), crate::integration::support::default_params())
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyInitialized));
    let config = ledger.engine.config().unwrap().unwrap();
    assert_eq!(config.authority, ledger.authority);
}
