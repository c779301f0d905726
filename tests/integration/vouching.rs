use crate::integration::support::{memory_ledger, MIN_STAKE};
use reputation_ledger::types::MAX_MULTIPLIER;
use reputation_ledger::{Disposition, LedgerError, LockupWithdrawal, VouchStatus};

const WEEK: i64 = 7 * 86_400;

#[test]
fn vault_record_and_profile_agree_on_amount() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let voucher = ledger.register_funded("voucher", 5 * MIN_STAKE);
    let before = ledger.engine.query_reputation(&target).unwrap().unwrap();

    let amount = 3 * MIN_STAKE + 17;
    ledger.engine.vouch(&voucher, &target, amount, true).unwrap();

    let vault = ledger.engine.query_vault(&voucher, &target).unwrap().unwrap();
    let record = ledger.engine.query_vouch(&voucher, &target).unwrap().unwrap();
    let after = ledger.engine.query_reputation(&target).unwrap().unwrap();
    assert_eq!(vault.balance, amount);
    assert_eq!(record.amount, amount);
    assert_eq!(after.staked_amount, before.staked_amount + amount);
    assert_eq!(ledger.engine.balance_of(&voucher).unwrap(), 2 * MIN_STAKE - 17);
}

#[test]
fn minimum_stake_boundary() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let voucher = ledger.register_funded("voucher", 10 * MIN_STAKE);

    let err = ledger
        .engine
        .vouch(&voucher, &target, MIN_STAKE - 1, true)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidStakeAmount { .. }));
    assert_eq!(err.code(), Some(6000));
    assert!(ledger.engine.query_vouch(&voucher, &target).unwrap().is_none());

    let receipt = ledger.engine.vouch(&voucher, &target, MIN_STAKE, true).unwrap();
    assert_eq!(receipt.record.score_delta, 1);
}

#[test]
fn self_vouch_rejected_for_any_amount() {
    let ledger = memory_ledger();
    let alice = ledger.register_funded("alice", 100 * MIN_STAKE);
    for amount in [0, MIN_STAKE, 100 * MIN_STAKE] {
        let err = ledger.engine.vouch(&alice, &alice, amount, true).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidVouch));
    }
    assert_eq!(ledger.engine.balance_of(&alice).unwrap(), 100 * MIN_STAKE);
}

#[test]
fn large_stake_is_capped() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let whale = ledger.register_funded("whale", 500 * MIN_STAKE);
    let receipt = ledger
        .engine
        .vouch(&whale, &target, 500 * MIN_STAKE, false)
        .unwrap();
    assert_eq!(receipt.record.score_delta, -(MAX_MULTIPLIER as i64));
    assert_eq!(receipt.target.reputation_score, 1_000 - MAX_MULTIPLIER);
    assert_eq!(receipt.target.negative_vouches, 1);
}

#[test]
fn unfunded_vouch_leaves_no_trace() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let voucher = ledger.register_funded("voucher", MIN_STAKE / 2);
    let before = ledger.engine.query_reputation(&target).unwrap().unwrap();

    let err = ledger
        .engine
        .vouch(&voucher, &target, MIN_STAKE, true)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStake { .. }));
    assert!(ledger.engine.query_vouch(&voucher, &target).unwrap().is_none());
    assert!(ledger.engine.query_vault(&voucher, &target).unwrap().is_none());
    assert_eq!(ledger.engine.query_reputation(&target).unwrap().unwrap(), before);
    assert_eq!(ledger.engine.balance_of(&voucher).unwrap(), MIN_STAKE / 2);
}

#[test]
fn vouch_for_unregistered_target_rejected() {
    let ledger = memory_ledger();
    let voucher = ledger.register_funded("voucher", MIN_STAKE);
    let ghost = reputation_ledger::Identity::from_label("ghost");
    assert!(matches!(
        ledger.engine.vouch(&voucher, &ghost, MIN_STAKE, true),
        Err(LedgerError::NotRegistered(_))
    ));
}

#[test]
fn withdrawal_after_lockup_returns_stake() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let voucher = ledger.register_funded("voucher", 2 * MIN_STAKE);
    ledger.engine.vouch(&voucher, &target, 2 * MIN_STAKE, true).unwrap();
    let resolver = LockupWithdrawal { lockup_secs: WEEK };

    ledger.clock.advance(WEEK - 1);
    assert!(matches!(
        ledger.engine.resolve_vouch(&voucher, &voucher, &target, &resolver),
        Err(LedgerError::LockupNotExpired { remaining_secs: 1 })
    ));
    assert!(matches!(
        ledger.engine.resolve_vouch(&target, &voucher, &target, &resolver),
        Err(LedgerError::InvalidAuthority(_))
    ));

    ledger.clock.advance(1);
    let record = ledger
        .engine
        .resolve_vouch(&voucher, &voucher, &target, &resolver)
        .unwrap();
    assert!(matches!(
        record.status,
        VouchStatus::Resolved {
            disposition: Disposition::Release,
            ..
        }
    ));
    assert_eq!(ledger.engine.balance_of(&voucher).unwrap(), 2 * MIN_STAKE);
    let profile = ledger.engine.query_reputation(&target).unwrap().unwrap();
    assert_eq!(profile.staked_amount, 0);
    assert_eq!(profile.reputation_score, 1_002);

    assert!(matches!(
        ledger.engine.resolve_vouch(&voucher, &voucher, &target, &resolver),
        Err(LedgerError::VouchNotActive { .. })
    ));
    assert!(matches!(
        ledger.engine.vouch(&voucher, &target, MIN_STAKE, true),
        Err(LedgerError::VouchAlreadyExists { .. })
    ));
}

#[test]
fn low_reputation_voucher_cannot_vouch() {
    let ledger = memory_ledger();
    let target = ledger.register("target");
    let weak = ledger.register_funded("weak", MIN_STAKE);
    let critics: Vec<_> = (0..20)
        .map(|i| ledger.register_funded(&format!("critic-{i}"), 50 * MIN_STAKE))
        .collect();
    for critic in &critics {
        ledger.engine.vouch(critic, &weak, 50 * MIN_STAKE, false).unwrap();
    }
    assert_eq!(ledger.score(&weak), 0);

    let err = ledger.engine.vouch(&weak, &target, MIN_STAKE, true).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientReputation { score: 0, .. }));
    assert_eq!(ledger.engine.balance_of(&weak).unwrap(), MIN_STAKE);
}
