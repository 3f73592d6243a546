// src/env.rs
//
// Gym-style 1-D GridWorld environment with a hidden goal and shaped rewards.
//
// This module provides:
// - GridWorld: single environment (reset, step)
// - VecEnv: vectorised environments for batched evaluation
// - Deterministic execution given seeds
//
// Per episode the goal is drawn uniformly and the start is drawn uniformly
// from the remaining cells. The agent never observes the goal or how
// rewards are computed; it only sees an Observation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::observation::Observation;
use crate::types::{Action, Position};

/// Result of a single environment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// The observation after taking the action.
    pub observation: Observation,
    /// The reward for this step.
    pub reward: f64,
    /// Whether the episode has terminated.
    pub done: bool,
    /// Additional information about the step.
    pub info: StepInfo,
}

/// Additional information returned from a step.
///
/// This is harness-side debug/evaluation data; policies must only be fed
/// the Observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInfo {
    /// Steps taken so far this episode.
    pub steps_taken: u64,
    /// The hidden goal cell.
    pub goal: Position,
    /// Topology-aware distance from the agent to the goal.
    pub distance_to_goal: usize,
    /// The agent reached the goal on this step.
    pub reached_goal: bool,
    /// The step limit fired on this step.
    pub timed_out: bool,
}

/// Deterministic 1-D GridWorld.
///
/// Standard RL interface:
/// - reset(seed) -> observation
/// - step(action) -> (observation, reward, done, info)
///
/// All state transitions are deterministic given the seed.
pub struct GridWorld {
    config: Config,
    rng: ChaCha8Rng,
    position: Position,
    goal: Position,
    steps_taken: u64,
    done: bool,
    seed: u64,
}

impl GridWorld {
    /// Create a new environment. Call `reset` before stepping.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(0),
            position: 0,
            goal: 0,
            steps_taken: 0,
            done: false,
            seed: 0,
        }
    }

    /// Reset the environment for a new episode with an optional seed.
    ///
    /// Returns the initial observation. Goal and start are redrawn; the
    /// start is never equal to the goal.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or_else(|| self.rng.gen());
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);

        let n = self.config.grid_size;
        self.goal = self.rng.gen_range(0..n);
        let mut start = self.rng.gen_range(0..n);
        while start == self.goal {
            start = self.rng.gen_range(0..n);
        }

        self.position = start;
        self.steps_taken = 0;
        self.done = false;

        Observation::from_position(&self.config, self.position, 0)
    }

    /// Reset to an explicit start/goal pair (evaluation and tests).
    ///
    /// Bypasses the random draw but otherwise behaves like `reset`.
    pub fn reset_to(&mut self, start: Position, goal: Position) -> Observation {
        let n = self.config.grid_size;
        assert!(start < n && goal < n, "start/goal out of range");
        assert_ne!(start, goal, "start must differ from goal");

        self.position = start;
        self.goal = goal;
        self.steps_taken = 0;
        self.done = false;

        Observation::from_position(&self.config, self.position, 0)
    }

    /// Take a step in the environment.
    ///
    /// Stepping a finished episode is a no-op that keeps reporting
    /// `done = true` with zero reward.
    pub fn step(&mut self, action: Action) -> StepResult {
        if self.done {
            let obs = Observation::from_position(&self.config, self.position, self.steps_taken);
            return StepResult {
                observation: obs,
                reward: 0.0,
                done: true,
                info: self.build_step_info(false, false),
            };
        }

        let topology = self.config.topology;
        let n = self.config.grid_size;
        let old_position = self.position;

        self.position = topology.apply(old_position, action, n);
        self.steps_taken += 1;

        let mut reached_goal = false;
        let mut timed_out = false;
        let reward;

        if self.position == self.goal {
            reward = self.config.rewards.goal_reward;
            reached_goal = true;
            self.done = true;
        } else {
            // Shaped step penalty: clamp/wrap first, then score the move.
            let old_dist = topology.distance(old_position, self.goal, n);
            let new_dist = topology.distance(self.position, self.goal, n);

            let mut r = if new_dist < old_dist {
                self.config.rewards.closer_penalty
            } else {
                self.config.rewards.away_penalty
            };

            if self.steps_taken >= self.config.step_limit {
                r += self.config.rewards.timeout_penalty;
                timed_out = true;
                self.done = true;
            }
            reward = r;
        }

        let obs = Observation::from_position(&self.config, self.position, self.steps_taken);
        StepResult {
            observation: obs,
            reward,
            done: self.done,
            info: self.build_step_info(reached_goal, timed_out),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The hidden goal cell (harness/eval use only).
    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn build_step_info(&self, reached_goal: bool, timed_out: bool) -> StepInfo {
        StepInfo {
            steps_taken: self.steps_taken,
            goal: self.goal,
            distance_to_goal: self.config.topology.distance(
                self.position,
                self.goal,
                self.config.grid_size,
            ),
            reached_goal,
            timed_out,
        }
    }
}

/// Vectorised environment for batched evaluation.
///
/// Manages N independent GridWorld instances.
pub struct VecEnv {
    envs: Vec<GridWorld>,
}

impl VecEnv {
    /// Create a new vectorised environment with N copies of the config.
    pub fn new(n: usize, config: Config) -> Self {
        let envs = (0..n).map(|_| GridWorld::new(config.clone())).collect();
        Self { envs }
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Reset all environments with optional per-environment seeds.
    ///
    /// Environments without a matching seed entry draw their own.
    pub fn reset_all(&mut self, seeds: Option<&[u64]>) -> Vec<Observation> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let seed = seeds.and_then(|s| s.get(i).copied());
                env.reset(seed)
            })
            .collect()
    }

    /// Step all environments with the given actions.
    ///
    /// Actions must have the same length as envs.
    pub fn step(&mut self, actions: &[Action]) -> Vec<StepResult> {
        assert_eq!(
            actions.len(),
            self.envs.len(),
            "Actions length must match number of environments"
        );

        self.envs
            .iter_mut()
            .zip(actions.iter())
            .map(|(env, action)| env.step(*action))
            .collect()
    }

    pub fn dones(&self) -> Vec<bool> {
        self.envs.iter().map(|e| e.is_done()).collect()
    }

    pub fn seeds(&self) -> Vec<u64> {
        self.envs.iter().map(|e| e.seed()).collect()
    }
}
