// src/bin/sweep.rs
//
// Multi-episode policy evaluation harness.
//
// Goals:
// - Deterministic paired evaluation: every policy faces the same sequence
//   of goal/start layouts (seed = base seed + episode index).
// - Aggregate per-policy statistics printed as a table and written as a
//   versioned JSON summary, with optional per-episode CSV rows.
//
// Run examples:
//   cargo run --bin sweep -- --episodes 50 --seed 42
//   cargo run --bin sweep -- --topology ring --policy commit,random --episodes 200
//   GRIDLINE_TOPOLOGY=ring cargo run --bin sweep -- --episodes 100 --quiet
//
// Optional CSV export:
//   cargo run --bin sweep -- --episodes 200 --csv episodes.csv

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use gridline::{
    resolve_effective_topology, run_sweep, write_episode_csv, write_summary_json, Config,
    PolicyKind, Topology,
};

const DEFAULT_EPISODES: usize = 50;
const DEFAULT_SEED: u64 = 1;
const DEFAULT_PRINT_EVERY: usize = 1;
const DEFAULT_OUTPUT_DIR: &str = "runs/sweep";

#[derive(Debug, Clone)]
struct Args {
    episodes: usize,
    grid_size: usize,
    step_limit: u64,
    seed: u64,
    topology: Option<Topology>,
    policies: Vec<PolicyKind>,
    quiet: bool,
    print_every: usize,
    csv_out: Option<PathBuf>,
    output_dir: PathBuf,
}

impl Args {
    fn usage() -> &'static str {
        "\
gridline policy sweep harness

USAGE:
  cargo run --bin sweep -- [FLAGS]

TOPOLOGY PRECEDENCE:
  1) --topology overrides environment
  2) else GRIDLINE_TOPOLOGY
  3) else bounded

FLAGS:
  --topology NAME      bounded | ring
  --policy LIST        Comma-separated subset of random,sweep,wildcard,commit
                       (default: all)
  --episodes N         Episodes per policy (default: 50)
  --grid-size N        Number of cells (default: 10)
  --step-limit N       Steps per episode before timeout (default: 100)
  --seed U64           Base seed (default: 1). Episode i uses seed + i.
  --print-every N      Print every Nth episode record (default: 1). Ignored with --quiet.
  --csv PATH           Write per-episode CSV rows to PATH (relative to output-dir)
  --output-dir DIR     Output directory (default: runs/sweep)
  --quiet              Suppress the per-policy table; only write files
  --help               Show this help

OUTPUT:
  The harness writes to <output-dir>/:
    - sweep_summary.json   Per-policy aggregate statistics
    - <csv>                CSV of per-episode records (if --csv specified)

EXAMPLES:
  cargo run --bin sweep -- --topology ring --episodes 500 --seed 7
  cargo run --bin sweep -- --policy commit --grid-size 25 --csv episodes.csv
"
    }

    fn parse_or_exit() -> Self {
        match Self::parse() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("{e}\n\n{}", Self::usage());
                std::process::exit(2);
            }
        }
    }

    fn parse() -> Result<Self, String> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(mut it: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut out = Args {
            episodes: DEFAULT_EPISODES,
            grid_size: 10,
            step_limit: 100,
            seed: DEFAULT_SEED,
            topology: None,
            policies: PolicyKind::ALL.to_vec(),
            quiet: false,
            print_every: DEFAULT_PRINT_EVERY,
            csv_out: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        };

        while let Some(arg) = it.next() {
            // Support --flag=value alongside --flag value.
            let (flag, inline) = match arg.split_once('=') {
                Some((f, v)) => (f.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                match &inline {
                    Some(v) => Ok(v.clone()),
                    None => it
                        .next()
                        .ok_or_else(|| format!("Missing value for {name}")),
                }
            };

            match flag.as_str() {
                "--help" | "-h" => {
                    println!("{}", Self::usage());
                    std::process::exit(0);
                }
                "--quiet" => out.quiet = true,

                "--topology" => {
                    let v = value("--topology")?;
                    out.topology = Some(
                        Topology::parse(&v)
                            .ok_or_else(|| "Invalid --topology. Expected: bounded | ring".to_string())?,
                    );
                }
                "--policy" => {
                    let v = value("--policy")?;
                    let mut kinds = Vec::new();
                    for name in v.split(',') {
                        if name.trim().eq_ignore_ascii_case("all") {
                            kinds.extend(PolicyKind::ALL);
                            continue;
                        }
                        kinds.push(PolicyKind::parse(name).ok_or_else(|| {
                            format!(
                                "Invalid policy '{name}'. Expected: random | sweep | wildcard | commit"
                            )
                        })?);
                    }
                    if kinds.is_empty() {
                        return Err("--policy must name at least one policy".to_string());
                    }
                    out.policies = kinds;
                }
                "--episodes" => {
                    let v = value("--episodes")?;
                    out.episodes = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --episodes (expected integer)".to_string())?;
                    if out.episodes == 0 {
                        return Err("--episodes must be >= 1".to_string());
                    }
                }
                "--grid-size" => {
                    let v = value("--grid-size")?;
                    out.grid_size = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --grid-size (expected integer)".to_string())?;
                }
                "--step-limit" => {
                    let v = value("--step-limit")?;
                    out.step_limit = v
                        .parse::<u64>()
                        .map_err(|_| "Invalid --step-limit (expected integer)".to_string())?;
                }
                "--seed" => {
                    let v = value("--seed")?;
                    out.seed = v
                        .parse::<u64>()
                        .map_err(|_| "Invalid --seed (expected u64)".to_string())?;
                }
                "--print-every" => {
                    let v = value("--print-every")?;
                    out.print_every = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --print-every (expected integer)".to_string())?;
                    if out.print_every == 0 {
                        return Err("--print-every must be >= 1".to_string());
                    }
                }
                "--csv" => {
                    let v = value("--csv")?;
                    out.csv_out = Some(PathBuf::from(v));
                }
                "--output-dir" => {
                    let v = value("--output-dir")?;
                    out.output_dir = PathBuf::from(v);
                }

                other => return Err(format!("Unknown argument: {other}")),
            }
        }

        Ok(out)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse_or_exit();

    let effective = resolve_effective_topology(args.topology);
    effective.log_startup();

    let cfg = Config::default()
        .with_topology(effective.topology)
        .with_grid_size(args.grid_size)
        .with_step_limit(args.step_limit);
    if let Err(e) = cfg.validate() {
        eprintln!("invalid config: {e}\n\n{}", Args::usage());
        std::process::exit(2);
    }

    let (summary, records) = run_sweep(&cfg, &args.policies, args.episodes, args.seed);

    if !args.quiet {
        println!(
            "sweep: topology={} grid_size={} step_limit={} episodes={} base_seed={}",
            cfg.topology.as_str(),
            cfg.grid_size,
            cfg.step_limit,
            args.episodes,
            args.seed
        );

        for r in &records {
            if r.episode % args.print_every == 0 {
                println!(
                    "policy={:<8} episode={:<4} seed={} steps={:>3} return={:>8.2} reached_goal={}",
                    r.policy, r.episode, r.seed, r.steps, r.total_return, r.reached_goal
                );
            }
        }

        println!();
        println!(
            "{:<10} {:>8} {:>12} {:>11} {:>11} {:>12}",
            "policy", "success", "mean_return", "p05", "p95", "steps_to_goal"
        );
        for p in &summary.policies {
            println!(
                "{:<10} {:>7.1}% {:>12.2} {:>11.2} {:>11.2} {:>12.1}",
                p.policy,
                p.success_rate * 100.0,
                p.mean_return,
                p.p05_return,
                p.p95_return,
                p.mean_steps_to_goal
            );
        }
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output dir {}", args.output_dir.display()))?;

    let summary_path = args.output_dir.join("sweep_summary.json");
    write_summary_json(&summary_path, &summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    if !args.quiet {
        println!();
        println!("wrote {}", summary_path.display());
    }

    if let Some(csv) = &args.csv_out {
        let csv_path = args.output_dir.join(csv);
        write_episode_csv(&csv_path, &records)
            .with_context(|| format!("writing {}", csv_path.display()))?;
        if !args.quiet {
            println!("wrote {}", csv_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.episodes, DEFAULT_EPISODES);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.print_every, DEFAULT_PRINT_EVERY);
        assert_eq!(args.policies, PolicyKind::ALL.to_vec());
        assert!(!args.quiet);
    }

    #[test]
    fn test_print_every_flag_both_forms() {
        let args = parse(&["--print-every", "10"]).unwrap();
        assert_eq!(args.print_every, 10);

        let args = parse(&["--print-every=25"]).unwrap();
        assert_eq!(args.print_every, 25);
    }

    #[test]
    fn test_print_every_rejects_zero_and_garbage() {
        assert!(parse(&["--print-every", "0"]).is_err());
        assert!(parse(&["--print-every", "often"]).is_err());
        assert!(parse(&["--print-every"]).is_err());
    }

    #[test]
    fn test_topology_and_policy_flags() {
        let args = parse(&["--topology", "ring", "--policy", "commit,random"]).unwrap();
        assert_eq!(args.topology, Some(Topology::Ring));
        assert_eq!(args.policies, vec![PolicyKind::Commit, PolicyKind::Random]);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse(&["--jitter-ms", "5"]).is_err());
    }
}
