// src/config.rs
//
// Central configuration for the gridline environment and harnesses.
// This is the single source of truth for grid geometry, topology, the
// shaped reward schedule, and the episode step limit.

use serde::{Deserialize, Serialize};

use crate::types::{Action, Position};

/// World topology: how movement behaves at the ends of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// A line with walls. Moving into a wall keeps the agent in place.
    Bounded,
    /// A ring. Moving past either end wraps around to the other side.
    Ring,
}

impl Topology {
    /// Return a stable lowercase name for the topology (used in logs/telemetry).
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Bounded => "bounded",
            Topology::Ring => "ring",
        }
    }

    /// Parse a topology name (case-insensitive). Returns None if unrecognized.
    pub fn parse(s: &str) -> Option<Topology> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounded" | "line" | "b" => Some(Topology::Bounded),
            "ring" | "wrap" | "r" => Some(Topology::Ring),
            _ => None,
        }
    }

    /// Apply a single move to `pos` on a grid of `n` cells.
    ///
    /// Bounded grids clamp at the walls; rings wrap modulo `n`.
    pub fn apply(&self, pos: Position, action: Action, n: usize) -> Position {
        debug_assert!(n >= 2 && pos < n);
        let next = pos as i64 + action.delta();
        match self {
            Topology::Bounded => next.clamp(0, n as i64 - 1) as Position,
            Topology::Ring => next.rem_euclid(n as i64) as Position,
        }
    }

    /// Distance between two cells under this topology.
    ///
    /// On the line this is `|a - b|`; on the ring it is the shorter of the
    /// two arc lengths.
    pub fn distance(&self, a: Position, b: Position, n: usize) -> usize {
        let d = a.abs_diff(b);
        match self {
            Topology::Bounded => d,
            Topology::Ring => d.min(n - d),
        }
    }
}

/// Shaped reward schedule, matching the hidden-goal reward structure:
/// a terminal bonus at the goal, small per-step penalties that favour
/// closing the distance, and a large penalty if the step limit is hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Terminal reward on reaching the goal.
    pub goal_reward: f64,
    /// Per-step reward when the distance to goal decreased.
    pub closer_penalty: f64,
    /// Per-step reward when the distance stayed the same or increased.
    pub away_penalty: f64,
    /// Additional reward applied on the final step when the step limit
    /// is reached without finding the goal.
    pub timeout_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal_reward: 10.0,
            closer_penalty: -0.1,
            away_penalty: -0.2,
            timeout_penalty: -100.0,
        }
    }
}

/// Environment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of cells on the grid. Must be >= 2 so start != goal is
    /// always satisfiable.
    pub grid_size: usize,
    /// Maximum steps per episode before the timeout penalty fires.
    pub step_limit: u64,
    /// World topology.
    pub topology: Topology,
    /// Reward schedule.
    pub rewards: RewardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 10,
            step_limit: 100,
            topology: Topology::Bounded,
            rewards: RewardConfig::default(),
        }
    }
}

impl Config {
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Validate the configuration. Returns a human-readable error on the
    /// first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 2 {
            return Err(format!(
                "grid_size must be >= 2, got {}",
                self.grid_size
            ));
        }
        if self.step_limit == 0 {
            return Err("step_limit must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Source of the effective topology (for logging/debugging precedence).
///
/// Precedence order (highest to lowest):
/// 1. CLI argument (--topology)
/// 2. Environment variable (GRIDLINE_TOPOLOGY)
/// 3. Default (Bounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologySource {
    Cli,
    Env,
    Default,
}

impl TopologySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologySource::Cli => "cli",
            TopologySource::Env => "env",
            TopologySource::Default => "default",
        }
    }
}

/// Resolved topology with its source for logging.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveTopology {
    pub topology: Topology,
    pub source: TopologySource,
}

impl EffectiveTopology {
    /// Log the effective topology at startup (to stderr).
    ///
    /// Format: `effective_topology=<topology> source=<source>`
    pub fn log_startup(&self) {
        eprintln!(
            "effective_topology={} source={}",
            self.topology.as_str(),
            self.source.as_str()
        );
    }
}

/// Resolve the effective topology using standard precedence rules.
///
/// Precedence (highest to lowest):
/// 1. `cli_topology` - if Some, use it (source=cli)
/// 2. `GRIDLINE_TOPOLOGY` env var - if set and parseable (source=env)
/// 3. Default Bounded (source=default)
pub fn resolve_effective_topology(cli_topology: Option<Topology>) -> EffectiveTopology {
    if let Some(t) = cli_topology {
        return EffectiveTopology {
            topology: t,
            source: TopologySource::Cli,
        };
    }

    if let Ok(raw) = std::env::var("GRIDLINE_TOPOLOGY") {
        if let Some(t) = Topology::parse(&raw) {
            return EffectiveTopology {
                topology: t,
                source: TopologySource::Env,
            };
        }
    }

    EffectiveTopology {
        topology: Topology::Bounded,
        source: TopologySource::Default,
    }
}
