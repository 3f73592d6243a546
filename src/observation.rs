// src/observation.rs
//
// Versioned Observation schema for policy input.
//
// Design requirements:
// - Versioned (obs_version field) for schema evolution
// - Serializable (serde) for logging and replay
// - The goal position is hidden: it never appears here. Policies see only
//   their own position, the grid geometry, and wall adjacency.

use serde::{Deserialize, Serialize};

use crate::config::{Config, Topology};
use crate::types::Position;

/// Current observation schema version.
/// Increment when adding/removing/changing fields.
pub const OBS_VERSION: u32 = 1;

/// What a policy is allowed to see at each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation schema version.
    pub obs_version: u32,
    /// Current cell index.
    pub position: Position,
    /// Steps taken so far this episode (0 at reset).
    pub steps_taken: u64,
    /// Number of cells on the grid.
    pub grid_size: usize,
    /// World topology.
    pub topology: Topology,
    /// Whether the agent is standing against the left wall.
    /// Always false on a ring.
    pub at_left_edge: bool,
    /// Whether the agent is standing against the right wall.
    /// Always false on a ring.
    pub at_right_edge: bool,
}

impl Observation {
    /// Build an observation from the agent's position and episode clock.
    pub fn from_position(cfg: &Config, position: Position, steps_taken: u64) -> Self {
        let bounded = cfg.topology == Topology::Bounded;
        Self {
            obs_version: OBS_VERSION,
            position,
            steps_taken,
            grid_size: cfg.grid_size,
            topology: cfg.topology,
            at_left_edge: bounded && position == 0,
            at_right_edge: bounded && position == cfg.grid_size - 1,
        }
    }
}
