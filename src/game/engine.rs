//! Per-tick decision pipeline
//!
//! Builds the occupancy grid, then either dodges (when we were just hit) or
//! picks a target and turns toward it. Lookup failures fall back to a
//! uniformly random action so every snapshot gets an answer.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::dodge::{DodgeTable, Threat};
use super::grid::OccupancyGrid;
use super::heading::{heading_toward, turn_toward};
use super::state::{Action, Heading, PlayerState, Snapshot};
use super::targeting::TargetPolicy;

/// Tunables that distinguish one bot personality from another
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub target_policy: TargetPolicy,
    pub dodge: DodgeTable,
}

/// Why the engine could not make a principled choice
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Self id {0:?} not present in arena")]
    SelfNotFound(String),

    #[error("No other player to target")]
    NoTarget,
}

/// Which branch of the pipeline produced the action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// Turning toward or closing in on a target
    Engage {
        target: String,
        desired: Heading,
        distance: u32,
    },
    /// Reacting to having been hit
    Dodge { threat: Option<Threat> },
    /// Random pick after a failed lookup
    Fallback { reason: LookupError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub branch: Branch,
}

impl Decision {
    pub fn is_fallback(&self) -> bool {
        matches!(self.branch, Branch::Fallback { .. })
    }
}

/// Hook notified after every decision
pub trait DecisionObserver: Send + Sync {
    fn observe(&self, snapshot: &Snapshot, decision: &Decision);
}

/// Observer that reports each decision as a `tracing` debug event
#[derive(Debug, Default)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn observe(&self, snapshot: &Snapshot, decision: &Decision) {
        let me = snapshot.me().map(|p| p.position);
        match &decision.branch {
            Branch::Engage {
                target,
                desired,
                distance,
            } => {
                let there = snapshot.arena.players.get(target).map(|p| p.position);
                debug!(
                    self_id = %snapshot.self_id,
                    self_pos = ?me,
                    target = %target,
                    target_pos = ?there,
                    dx = there.zip(me).map(|(t, s)| t.x - s.x),
                    dy = there.zip(me).map(|(t, s)| t.y - s.y),
                    distance,
                    desired = %desired,
                    action = %decision.action,
                    "Engaging target"
                );
            }
            Branch::Dodge { threat } => {
                debug!(
                    self_id = %snapshot.self_id,
                    self_pos = ?me,
                    threat = ?threat,
                    action = %decision.action,
                    "Dodging"
                );
            }
            Branch::Fallback { reason } => {
                debug!(
                    self_id = %snapshot.self_id,
                    reason = %reason,
                    action = %decision.action,
                    "Falling back to random action"
                );
            }
        }
    }
}

/// Stateless decision engine; safe to share across concurrent requests
#[derive(Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
    observer: Option<Arc<dyn DecisionObserver>>,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide this tick's action. `rng` is only consulted on fallback.
    pub fn decide<R: Rng + ?Sized>(&self, snapshot: &Snapshot, rng: &mut R) -> Decision {
        let decision = self.plan(snapshot).unwrap_or_else(|reason| Decision {
            action: Action::random(rng),
            branch: Branch::Fallback { reason },
        });

        if let Some(observer) = &self.observer {
            observer.observe(snapshot, &decision);
        }

        decision
    }

    fn plan(&self, snapshot: &Snapshot) -> Result<Decision, LookupError> {
        let me = snapshot
            .me()
            .ok_or_else(|| LookupError::SelfNotFound(snapshot.self_id.clone()))?;
        let grid = OccupancyGrid::build(&snapshot.arena);

        if me.was_hit {
            let outcome = self.config.dodge.evaluate(&snapshot.self_id, me, &grid);
            return Ok(Decision {
                action: outcome.action,
                branch: Branch::Dodge {
                    threat: outcome.threat,
                },
            });
        }

        let (target_id, target) = self
            .config
            .target_policy
            .select(&snapshot.arena, &snapshot.self_id, me)
            .ok_or(LookupError::NoTarget)?;

        Ok(engage(me, target_id, target, &grid))
    }
}

/// Face the target; once adjacent and facing it, hold and fire in place
fn engage(me: &PlayerState, target_id: &str, target: &PlayerState, grid: &OccupancyGrid<'_>) -> Decision {
    let dx = target.position.x - me.position.x;
    let dy = target.position.y - me.position.y;
    let distance = me.position.manhattan(&target.position);
    let desired = heading_toward(dx, dy);

    let fallback = if distance == 1 {
        Action::Hold
    } else {
        grid.forward(me.position, me.heading)
    };

    Decision {
        action: turn_toward(me.heading, desired, fallback),
        branch: Branch::Engage {
            target: target_id.to_string(),
            desired,
            distance,
        },
    }
}
