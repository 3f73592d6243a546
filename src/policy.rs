// src/policy.rs
//
// Policy trait and the navigation heuristics under evaluation.
//
// Policies map Observations to Actions. None of them see the goal; they
// only have their own position, the grid geometry, and wall adjacency.
// Each policy is deterministic given its episode seed.
//
// The line-up:
// - RandomPolicy: coin-flip baseline
// - SweepPolicy: walk one way, reverse on hitting a wall
// - WildcardPolicy: expanding zig-zag search around the start cell
// - CommitPolicy: pick a direction once and never deviate

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Topology;
use crate::observation::Observation;
use crate::types::{Action, Position};

pub const RANDOM_POLICY_VERSION: &str = "random-v1.0.0";
pub const SWEEP_POLICY_VERSION: &str = "sweep-v1.0.0";
pub const WILDCARD_POLICY_VERSION: &str = "wildcard-v1.0.0";
pub const COMMIT_POLICY_VERSION: &str = "commit-v1.0.0";

/// Interface for all policy implementations.
pub trait Policy: Send {
    /// Unique version string for this policy implementation.
    fn version(&self) -> &str;

    /// Compute an action given the current observation.
    ///
    /// May update internal policy state (search progress, direction).
    fn act(&mut self, obs: &Observation) -> Action;

    /// Reset the policy for a new episode.
    ///
    /// Called at the start of each episode. The seed enables deterministic
    /// episode sequences.
    fn reset_episode(&mut self, seed: u64, episode_id: u64);
}

/// Uniform random Left/Right.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }
}

impl Policy for RandomPolicy {
    fn version(&self) -> &str {
        RANDOM_POLICY_VERSION
    }

    fn act(&mut self, _obs: &Observation) -> Action {
        if self.rng.gen_range(0..2) == 0 {
            Action::Left
        } else {
            Action::Right
        }
    }

    fn reset_episode(&mut self, seed: u64, episode_id: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(episode_id));
    }
}

/// Boundary-seeking sweep: walk in one direction, reverse at a wall.
///
/// The initial direction is drawn at episode reset. On a ring no wall is
/// ever observed, so the policy keeps its initial direction for the whole
/// episode.
pub struct SweepPolicy {
    direction: Action,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepPolicy {
    pub fn new() -> Self {
        Self {
            direction: Action::Right,
        }
    }

    pub fn direction(&self) -> Action {
        self.direction
    }
}

impl Policy for SweepPolicy {
    fn version(&self) -> &str {
        SWEEP_POLICY_VERSION
    }

    fn act(&mut self, obs: &Observation) -> Action {
        let at_wall = (obs.at_left_edge && self.direction == Action::Left)
            || (obs.at_right_edge && self.direction == Action::Right);
        if at_wall {
            self.direction = self.direction.opposite();
        }
        self.direction
    }

    fn reset_episode(&mut self, seed: u64, episode_id: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(episode_id));
        self.direction = if rng.gen_range(0..2) == 0 {
            Action::Left
        } else {
            Action::Right
        };
    }
}

/// Expanding zig-zag search around the episode's start cell.
///
/// Legs target offsets +1, -1, +2, -2, ... from the origin; the extent
/// grows after each left-to-right turn. On a bounded line targets clamp at
/// the walls; on a ring they wrap.
pub struct WildcardPolicy {
    origin: Position,
    extent: i64,
    /// Current leg sign: +1 heading right, -1 heading left.
    direction: i64,
}

impl Default for WildcardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl WildcardPolicy {
    pub fn new() -> Self {
        Self {
            origin: 0,
            extent: 1,
            direction: 1,
        }
    }

    fn target(&self, obs: &Observation) -> Position {
        let n = obs.grid_size as i64;
        let raw = self.origin as i64 + self.direction * self.extent;
        let t = match obs.topology {
            Topology::Bounded => raw.clamp(0, n - 1),
            Topology::Ring => raw.rem_euclid(n),
        };
        t as Position
    }
}

impl Policy for WildcardPolicy {
    fn version(&self) -> &str {
        WILDCARD_POLICY_VERSION
    }

    fn act(&mut self, obs: &Observation) -> Action {
        if obs.steps_taken == 0 {
            self.origin = obs.position;
            self.extent = 1;
            self.direction = 1;
            return Action::Right;
        }

        let target = self.target(obs);

        // End of leg: turn around; extent grows on the left-to-right turn.
        if obs.position == target {
            if self.direction == 1 {
                self.direction = -1;
            } else {
                self.direction = 1;
                self.extent += 1;
            }
        }

        match obs.topology {
            Topology::Bounded => {
                if obs.position < target {
                    Action::Right
                } else if obs.position > target {
                    Action::Left
                } else if self.direction == 1 {
                    Action::Right
                } else {
                    Action::Left
                }
            }
            // Cell-index comparisons are meaningless on a ring: walk the
            // current leg's direction until the target cell comes up.
            Topology::Ring => {
                if self.direction == 1 {
                    Action::Right
                } else {
                    Action::Left
                }
            }
        }
    }

    fn reset_episode(&mut self, _seed: u64, _episode_id: u64) {
        // Search state re-anchors on the first act() of the episode.
        self.extent = 1;
        self.direction = 1;
    }
}

/// Pick a direction once per episode and commit to it.
///
/// On a ring this visits every cell within grid_size - 1 steps, so it is
/// the optimal goal-blind policy there. On a bounded line it pins itself
/// against a wall whenever the goal lies the other way.
pub struct CommitPolicy {
    direction: Action,
    fixed: Option<Action>,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitPolicy {
    /// Direction drawn from the episode seed at reset.
    pub fn new() -> Self {
        Self {
            direction: Action::Right,
            fixed: None,
        }
    }

    /// Always commit to the given direction.
    pub fn with_direction(direction: Action) -> Self {
        Self {
            direction,
            fixed: Some(direction),
        }
    }

    pub fn direction(&self) -> Action {
        self.direction
    }
}

impl Policy for CommitPolicy {
    fn version(&self) -> &str {
        COMMIT_POLICY_VERSION
    }

    fn act(&mut self, _obs: &Observation) -> Action {
        self.direction
    }

    fn reset_episode(&mut self, seed: u64, episode_id: u64) {
        self.direction = match self.fixed {
            Some(d) => d,
            None => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(episode_id));
                if rng.gen_range(0..2) == 0 {
                    Action::Left
                } else {
                    Action::Right
                }
            }
        };
    }
}

/// Named policy selector for harnesses and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Random,
    Sweep,
    Wildcard,
    Commit,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Random,
        PolicyKind::Sweep,
        PolicyKind::Wildcard,
        PolicyKind::Commit,
    ];

    /// Stable lowercase name (used in logs/telemetry and CLI flags).
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Sweep => "sweep",
            PolicyKind::Wildcard => "wildcard",
            PolicyKind::Commit => "commit",
        }
    }

    /// Parse a policy name (case-insensitive). Returns None if unrecognized.
    pub fn parse(s: &str) -> Option<PolicyKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "rand" => Some(PolicyKind::Random),
            "sweep" | "monotonous" => Some(PolicyKind::Sweep),
            "wildcard" | "zigzag" => Some(PolicyKind::Wildcard),
            "commit" | "fixed" => Some(PolicyKind::Commit),
            _ => None,
        }
    }

    /// Construct a fresh policy instance of this kind.
    pub fn build(&self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new()),
            PolicyKind::Sweep => Box::new(SweepPolicy::new()),
            PolicyKind::Wildcard => Box::new(WildcardPolicy::new()),
            PolicyKind::Commit => Box::new(CommitPolicy::new()),
        }
    }
}
