//! Gridline core library.
//!
//! This crate exposes a deterministic 1-D GridWorld with a hidden goal and
//! shaped rewards, the navigation policies under study, and the episode /
//! sweep harnesses used to compare them. The binaries (`src/main.rs`,
//! `src/bin/sweep.rs`) are thin research harnesses around these components.
//!
//! # Architecture
//!
//! - **Environment** (`env`): Gym-style `reset(seed)` / `step(action)`
//!   interface over a bounded line or a wrap-around ring, plus a
//!   vectorised wrapper for batched evaluation.
//!
//! - **Observation** (`observation`): Versioned, serializable snapshot fed
//!   to policies. The goal never appears in it.
//!
//! - **Policies** (`policy`): The `Policy` trait and four goal-blind
//!   heuristics — random, wall-reversing sweep, expanding zig-zag search,
//!   and fixed-direction commit.
//!
//! - **Runner** (`runner`): Deterministic episode mechanics with per-step
//!   telemetry and a serializable summary.
//!
//! - **Experiments** (`experiment`): Paired multi-episode sweeps across
//!   policies with aggregate statistics and JSON/CSV output.
//!
//! The topology question this crate exists to probe: on a bounded line,
//! boundary-seeking heuristics work because walls carry information; on a
//! ring there are no walls, and picking one direction and committing to it
//! covers every cell in at most `grid_size - 1` steps.

pub mod config;
pub mod env;
pub mod experiment;
pub mod logging;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod runner;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{
    resolve_effective_topology, Config, EffectiveTopology, RewardConfig, Topology, TopologySource,
};

pub use env::{GridWorld, StepInfo, StepResult, VecEnv};

pub use observation::{Observation, OBS_VERSION};

pub use policy::{
    CommitPolicy, Policy, PolicyKind, RandomPolicy, SweepPolicy, WildcardPolicy,
    COMMIT_POLICY_VERSION, RANDOM_POLICY_VERSION, SWEEP_POLICY_VERSION, WILDCARD_POLICY_VERSION,
};

pub use logging::{EventSink, FileSink, NoopSink, StepRecord};

pub use metrics::{percentile, OnlineStats};

pub use runner::{EpisodeConfig, EpisodeRunner, EpisodeSummary, TerminationReason};

pub use experiment::{
    run_policy_sweep, run_sweep, write_episode_csv, write_summary_json, EpisodeRecord,
    PolicyReport, SweepConfig, SweepSummary, SWEEP_SCHEMA_VERSION,
};

pub use types::{Action, Position};
