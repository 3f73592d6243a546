// src/main.rs
//
// Thin demo harness: one verbose episode per policy on the configured
// topology. For multi-episode evaluation use the `sweep` binary.
//
// Topology precedence: GRIDLINE_TOPOLOGY env var, else Bounded.
//
//   GRIDLINE_TOPOLOGY=ring cargo run

use gridline::{
    resolve_effective_topology, Config, EpisodeConfig, EpisodeRunner, NoopSink, PolicyKind,
};

fn main() {
    let effective = resolve_effective_topology(None);
    effective.log_startup();

    let cfg = Config::default().with_topology(effective.topology);
    if let Err(e) = cfg.validate() {
        eprintln!("invalid config: {e}");
        std::process::exit(2);
    }

    for kind in PolicyKind::ALL {
        println!();
        println!(
            "=== {} on {} (grid_size={}, step_limit={}) ===",
            kind.as_str(),
            cfg.topology.as_str(),
            cfg.grid_size,
            cfg.step_limit
        );

        let mut runner = EpisodeRunner::new(cfg.clone(), kind.build(), NoopSink);
        let summary = runner.run_episode(
            EpisodeConfig::default()
                .with_seed(42)
                .with_episode_id(0)
                .with_verbosity(1),
        );

        println!(
            "result: {:?} in {} steps, return {:.1} (start={} goal={})",
            summary.termination_reason,
            summary.steps,
            summary.total_return,
            summary.start,
            summary.goal
        );
    }
}
