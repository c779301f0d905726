use crate::integration::support::{default_params, GENESIS, MIN_STAKE};
use reputation_ledger::types::MIN_DECAY_INTERVAL;
use reputation_ledger::{Identity, LedgerError, ManualClock, ReputationEngine, SledSlotStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn open(path: &Path, clock: Arc<ManualClock>) -> ReputationEngine {
    let store = SledSlotStore::new(path).unwrap();
    ReputationEngine::new(Arc::new(store), clock)
}

#[test]
fn ledger_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger");
    let clock = Arc::new(ManualClock::new(GENESIS));
    let authority = Identity::from_label("authority");
    let alice = Identity::from_label("alice");
    let bob = Identity::from_label("bob");

    {
        let engine = open(&path, clock.clone());
        engine.initialize(&authority, default_params()).unwrap();
        engine.register_agent(&alice, "alice", "ipfs://alice").unwrap();
        engine.register_agent(&bob, "bob", "").unwrap();
        engine.fund(&authority, &bob, 3 * MIN_STAKE).unwrap();
        engine.complete_task(&alice, "t1", "ipfs://proof").unwrap();
        engine.vouch(&bob, &alice, 3 * MIN_STAKE, true).unwrap();
    }

    let engine = open(&path, clock.clone());
    let profile = engine.query_reputation(&alice).unwrap().unwrap();
    assert_eq!(profile.reputation_score, 1_103);
    assert_eq!(profile.metadata_uri, "ipfs://alice");
    assert_eq!(profile.staked_amount, 3 * MIN_STAKE);
    let task = engine.query_task(&alice, "t1").unwrap().unwrap();
    assert_eq!(task.proof_uri, "ipfs://proof");
    assert_eq!(engine.config().unwrap().unwrap().total_agents, 2);
    assert_eq!(engine.balance_of(&bob).unwrap(), 0);

    assert!(matches!(
        engine.complete_task(&alice, "t1", ""),
        Err(LedgerError::TaskAlreadyComplete(_))
    ));
    clock.advance(MIN_DECAY_INTERVAL);
    assert_eq!(engine.decay(&bob, &alice).unwrap().reputation_score, 1_093);
}

#[test]
fn rejected_operation_persists_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger");
    let clock = Arc::new(ManualClock::new(GENESIS));
    let alice = Identity::from_label("alice");

    let engine = open(&path, clock);
    assert!(matches!(
        engine.register_agent(&alice, "alice", ""),
        Err(LedgerError::NotInitialized)
    ));
    assert!(engine.query_reputation(&alice).unwrap().is_none());
    assert!(engine.config().unwrap().is_none());
}
