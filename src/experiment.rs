// src/experiment.rs
//
// Multi-episode policy evaluation harness.
//
// Goals:
// - Deterministic multi-episode evaluation using seed offsets: episode i
//   runs with base_seed + i, for every policy, so policies face identical
//   goal/start layouts and the comparison is paired.
// - Aggregate per-policy statistics (Welford stats + percentiles,
//   success rate, steps-to-goal).
// - Versioned JSON summary + optional per-episode CSV rows.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::logging::NoopSink;
use crate::metrics::{percentile, OnlineStats};
use crate::policy::PolicyKind;
use crate::runner::{EpisodeConfig, EpisodeRunner, EpisodeSummary};

/// Schema version for sweep_summary.json. Increment on breaking changes.
pub const SWEEP_SCHEMA_VERSION: u32 = 1;

/// Sweep configuration parameters, echoed into the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub episodes: usize,
    pub base_seed: u64,
    pub grid_size: usize,
    pub step_limit: u64,
    pub topology: String,
}

impl SweepConfig {
    pub fn new(cfg: &Config, episodes: usize, base_seed: u64) -> Self {
        Self {
            episodes,
            base_seed,
            grid_size: cfg.grid_size,
            step_limit: cfg.step_limit,
            topology: cfg.topology.as_str().to_string(),
        }
    }
}

/// Single episode record for CSV / JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub policy: String,
    pub episode: usize,
    pub seed: u64,
    pub steps: u64,
    pub total_return: f64,
    pub reached_goal: bool,
    pub start: usize,
    pub goal: usize,
}

impl EpisodeRecord {
    fn from_summary(policy: PolicyKind, episode: usize, summary: &EpisodeSummary) -> Self {
        Self {
            policy: policy.as_str().to_string(),
            episode,
            seed: summary.seed,
            steps: summary.steps,
            total_return: summary.total_return,
            reached_goal: summary.reached_goal(),
            start: summary.start,
            goal: summary.goal,
        }
    }
}

/// Aggregate statistics for one policy over a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyReport {
    pub policy: String,
    pub policy_version: String,
    pub episodes: usize,
    /// Fraction of episodes that reached the goal.
    pub success_rate: f64,
    pub mean_return: f64,
    pub std_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub p05_return: f64,
    pub p50_return: f64,
    pub p95_return: f64,
    /// Mean steps over all episodes (timeouts included).
    pub mean_steps: f64,
    /// Mean steps over successful episodes only; 0.0 if none succeeded.
    pub mean_steps_to_goal: f64,
}

/// Sweep summary output (versioned schema).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub schema_version: u32,
    pub gridline_version: String,
    pub config: SweepConfig,
    pub policies: Vec<PolicyReport>,
}

/// Run one policy over `episodes` episodes with seeds base_seed + i.
pub fn run_policy_sweep(
    cfg: &Config,
    kind: PolicyKind,
    episodes: usize,
    base_seed: u64,
) -> (PolicyReport, Vec<EpisodeRecord>) {
    let mut runner = EpisodeRunner::new(cfg.clone(), kind.build(), NoopSink);

    let mut records = Vec::with_capacity(episodes);
    let mut return_stats = OnlineStats::default();
    let mut step_stats = OnlineStats::default();
    let mut goal_step_stats = OnlineStats::default();
    let mut returns = Vec::with_capacity(episodes);
    let mut successes = 0usize;
    let mut policy_version = String::new();

    for i in 0..episodes {
        let ep_config = EpisodeConfig::default()
            .with_seed(base_seed.wrapping_add(i as u64))
            .with_episode_id(i as u64);
        let summary = runner.run_episode(ep_config);

        return_stats.add(summary.total_return);
        step_stats.add(summary.steps as f64);
        returns.push(summary.total_return);
        if summary.reached_goal() {
            successes += 1;
            goal_step_stats.add(summary.steps as f64);
        }
        policy_version = summary.policy_version.clone();

        records.push(EpisodeRecord::from_summary(kind, i, &summary));
    }

    returns.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let report = PolicyReport {
        policy: kind.as_str().to_string(),
        policy_version,
        episodes,
        success_rate: if episodes == 0 {
            0.0
        } else {
            successes as f64 / episodes as f64
        },
        mean_return: return_stats.mean(),
        std_return: return_stats.stddev_sample(),
        min_return: return_stats.min(),
        max_return: return_stats.max(),
        p05_return: percentile(&returns, 0.05),
        p50_return: percentile(&returns, 0.50),
        p95_return: percentile(&returns, 0.95),
        mean_steps: step_stats.mean(),
        mean_steps_to_goal: goal_step_stats.mean(),
    };

    (report, records)
}

/// Run all requested policies over a shared seed schedule.
pub fn run_sweep(
    cfg: &Config,
    kinds: &[PolicyKind],
    episodes: usize,
    base_seed: u64,
) -> (SweepSummary, Vec<EpisodeRecord>) {
    let mut policies = Vec::with_capacity(kinds.len());
    let mut all_records = Vec::new();

    for &kind in kinds {
        let (report, records) = run_policy_sweep(cfg, kind, episodes, base_seed);
        policies.push(report);
        all_records.extend(records);
    }

    let summary = SweepSummary {
        schema_version: SWEEP_SCHEMA_VERSION,
        gridline_version: env!("CARGO_PKG_VERSION").to_string(),
        config: SweepConfig::new(cfg, episodes, base_seed),
        policies,
    };

    (summary, all_records)
}

/// Write the sweep summary as pretty-printed JSON.
pub fn write_summary_json<P: AsRef<Path>>(path: P, summary: &SweepSummary) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Write per-episode records as CSV.
pub fn write_episode_csv<P: AsRef<Path>>(path: P, records: &[EpisodeRecord]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "policy,episode,seed,steps,total_return,reached_goal,start,goal"
    )?;
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            r.policy, r.episode, r.seed, r.steps, r.total_return, r.reached_goal, r.start, r.goal
        )?;
    }
    writer.flush()
}
