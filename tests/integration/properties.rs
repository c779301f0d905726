use crate::integration::support::{memory_ledger_with, MIN_STAKE};
use proptest::prelude::*;
use proptest::test_runner::{TestRng, TestRunner};
use reputation_ledger::address::{self, derive};
use reputation_ledger::types::{MAX_MULTIPLIER, MIN_DECAY_INTERVAL, SCORE_CEILING, STARTING_SCORE};
use reputation_ledger::{Identity, ProtocolParams};
use std::cell::Cell;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Task,
    Decay { wait: i64 },
    Vouch { voucher: usize, multiple: u64, positive: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Task),
        (0..2 * MIN_DECAY_INTERVAL).prop_map(|wait| Op::Decay { wait }),
        (0usize..4, 1u64..80, any::<bool>()).prop_map(|(voucher, multiple, positive)| Op::Vouch {
            voucher,
            multiple,
            positive,
        }),
    ]
}

/// Rewards and decay large enough that a short run can hit either bound
fn params() -> impl Strategy<Value = ProtocolParams> {
    (1u64..=5_000, 1u64..=5_000).prop_map(|(reward_amount, decay_rate)| ProtocolParams {
        min_stake: MIN_STAKE,
        decay_rate,
        reward_amount,
    })
}

fn scenario() -> impl Strategy<Value = (ProtocolParams, Vec<Op>)> {
    (params(), prop::collection::vec(op(), 1..60))
}

#[derive(Debug, Default, Clone, Copy)]
struct Extremes {
    hit_ceiling: bool,
    hit_floor: bool,
}

/// Replays `ops` and checks every accepted change against a clamped model of the score
fn replay(params: ProtocolParams, ops: &[Op]) -> Result<Extremes, TestCaseError> {
    let ledger = memory_ledger_with(params);
    let target = ledger.register("target");
    let vouchers: Vec<_> = (0..4)
        .map(|i| ledger.register_funded(&format!("voucher-{i}"), 4_000 * MIN_STAKE))
        .collect();

    let mut expected = STARTING_SCORE;
    let mut extremes = Extremes::default();
    let mut task = 0u32;
    for op in ops {
        match op {
            Op::Task => {
                task += 1;
                if ledger.engine.complete_task(&target, &format!("t{task}"), "").is_ok() {
                    expected = (expected + params.reward_amount).min(SCORE_CEILING);
                }
            }
            Op::Decay { wait } => {
                ledger.clock.advance(*wait);
                if ledger.engine.decay(&target, &target).is_ok() {
                    expected = expected.saturating_sub(params.decay_rate);
                }
            }
            Op::Vouch { voucher, multiple, positive } => {
                let accepted = ledger
                    .engine
                    .vouch(&vouchers[*voucher], &target, multiple * MIN_STAKE, *positive)
                    .is_ok();
                if accepted {
                    let weight = (*multiple).min(MAX_MULTIPLIER);
                    expected = if *positive {
                        (expected + weight).min(SCORE_CEILING)
                    } else {
                        expected.saturating_sub(weight)
                    };
                }
            }
        }
        let score = ledger.score(&target);
        prop_assert!(score <= SCORE_CEILING);
        prop_assert_eq!(score, expected);
        extremes.hit_ceiling |= score == SCORE_CEILING;
        extremes.hit_floor |= score == 0;
    }
    Ok(extremes)
}

#[test]
fn generated_runs_reach_both_score_bounds() {
    let config = ProptestConfig::with_cases(64);
    let rng = TestRng::deterministic_rng(config.rng_algorithm);
    let mut runner = TestRunner::new_with_rng(config, rng);
    let ceilings = Cell::new(0usize);
    let floors = Cell::new(0usize);
    runner
        .run(&scenario(), |(params, ops)| {
            let extremes = replay(params, &ops)?;
            ceilings.set(ceilings.get() + usize::from(extremes.hit_ceiling));
            floors.set(floors.get() + usize::from(extremes.hit_floor));
            Ok(())
        })
        .unwrap();
    assert!(ceilings.get() > 0, "no generated run reached the score ceiling");
    assert!(floors.get() > 0, "no generated run reached a zero score");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn score_follows_clamped_model((params, ops) in scenario()) {
        replay(params, &ops)?;
    }

    #[test]
    fn distinct_task_ids_get_distinct_addresses(a in "[a-z0-9]{1,16}", b in "[a-z0-9]{1,16}") {
        prop_assume!(a != b);
        let agent = Identity::from_label("agent");
        let (addr_a, _) = address::task_address(&agent, &a).unwrap();
        let (addr_b, _) = address::task_address(&agent, &b).unwrap();
        prop_assert_ne!(addr_a, addr_b);
    }

    #[test]
    fn split_point_changes_address(s in "[a-z]{2,24}", split in 1usize..23) {
        prop_assume!(split < s.len());
        let (left, right) = s.split_at(split);
        let joined = derive("task", &[s.as_bytes()]).unwrap();
        let parts = derive("task", &[left.as_bytes(), right.as_bytes()]).unwrap();
        prop_assert_ne!(joined.0, parts.0);
    }
}

#[test]
fn record_kinds_never_share_addresses() {
    let ids: Vec<_> = (0..16).map(|i| Identity::from_label(&format!("id-{i}"))).collect();
    let mut seen = HashSet::new();
    seen.insert(address::config_address().unwrap().0);
    for a in &ids {
        assert!(seen.insert(address::agent_address(a).unwrap().0));
        assert!(seen.insert(address::balance_address(a).unwrap().0));
        assert!(seen.insert(address::task_address(a, "t1").unwrap().0));
        for b in &ids {
            if a != b {
                assert!(seen.insert(address::vouch_address(a, b).unwrap().0));
                assert!(seen.insert(address::stake_address(a, b).unwrap().0));
            }
        }
    }
}
