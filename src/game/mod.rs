//! Bot decision core: occupancy grid, targeting, dodging, heading resolution

pub mod dodge;
pub mod engine;
pub mod grid;
pub mod heading;
pub mod state;
pub mod targeting;

pub use dodge::{DodgeTable, HORIZONTAL_DODGE_LOWER_HALF};
pub use engine::{Decision, DecisionEngine, EngineConfig, TracingObserver};
pub use state::{Arena, Heading, PlayerState, Snapshot};
pub use targeting::TargetPolicy;
