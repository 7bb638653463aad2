//! Application state shared across routes

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::game::{Decision, DecisionEngine, Snapshot, TracingObserver};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
    pub stats: Arc<DecisionStats>,
    /// Seeds a fresh generator per request; never held across a decision
    seed_source: Arc<Mutex<ChaCha8Rng>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut engine = DecisionEngine::new(config.engine_config());
        if config.trace_decisions {
            engine = engine.with_observer(Arc::new(TracingObserver));
        }

        let seed_source = match config.fallback_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            engine: Arc::new(engine),
            stats: Arc::new(DecisionStats::default()),
            seed_source: Arc::new(Mutex::new(seed_source)),
        }
    }

    /// Run the engine with a per-call random source and record the outcome
    pub fn decide(&self, snapshot: &Snapshot) -> Decision {
        let seed: u64 = self.seed_source.lock().gen();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let decision = self.engine.decide(snapshot, &mut rng);
        self.stats.record(&decision);
        decision
    }
}

/// Counters reported by the health endpoint
#[derive(Debug, Default)]
pub struct DecisionStats {
    decisions: AtomicU64,
    fallbacks: AtomicU64,
}

impl DecisionStats {
    pub fn record(&self, decision: &Decision) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
        if decision.is_fallback() {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn decisions(&self) -> u64 {
        self.decisions.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }
}
