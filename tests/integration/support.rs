use reputation_ledger::{Identity, ManualClock, MemoryStore, ProtocolParams, ReputationEngine};
use std::sync::Arc;

pub const GENESIS: i64 = 1_767_225_600;
pub const MIN_STAKE: u64 = 1_000_000_000;

pub fn default_params() -> ProtocolParams {
    ProtocolParams {
        min_stake: MIN_STAKE,
        decay_rate: 10,
        reward_amount: 100,
    }
}

pub struct TestLedger {
    pub engine: ReputationEngine,
    pub clock: Arc<ManualClock>,
    pub authority: Identity,
}

/// In-memory ledger initialized with the default parameters
pub fn memory_ledger() -> TestLedger {
    memory_ledger_with(default_params())
}

pub fn memory_ledger_with(params: ProtocolParams) -> TestLedger {
    let clock = Arc::new(ManualClock::new(GENESIS));
    let engine = ReputationEngine::new(Arc::new(MemoryStore::new()), clock.clone());
    let authority = Identity::from_label("authority");
    engine.initialize(&authority, params).unwrap();
    TestLedger {
        engine,
        clock,
        authority,
    }
}

impl TestLedger {
    pub fn register(&self, label: &str) -> Identity {
        let identity = Identity::from_label(label);
        self.engine.register_agent(&identity, label, "").unwrap();
        identity
    }

    pub fn register_funded(&self, label: &str, amount: u64) -> Identity {
        let identity = self.register(label);
        self.engine.fund(&self.authority, &identity, amount).unwrap();
        identity
    }

    pub fn score(&self, identity: &Identity) -> u64 {
        self.engine
            .query_reputation(identity)
            .unwrap()
            .unwrap()
            .reputation_score
    }
}
