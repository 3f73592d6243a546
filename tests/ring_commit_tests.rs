// tests/ring_commit_tests.rs
//
// The central claim about the ring: a fixed-direction policy visits every
// cell exactly once before any repeat and reaches the goal in at most
// grid_size - 1 steps from any start. Verified exhaustively for small
// grids and by seed sweep for a larger one.

use std::collections::HashSet;

use gridline::{
    Action, CommitPolicy, Config, EpisodeConfig, EpisodeRunner, GridWorld, NoopSink,
    TerminationReason, Topology,
};

#[test]
fn commit_reaches_goal_in_at_most_n_minus_one_steps_exhaustive() {
    for n in 3..=12usize {
        let cfg = Config::default()
            .with_topology(Topology::Ring)
            .with_grid_size(n);

        for direction in [Action::Left, Action::Right] {
            for start in 0..n {
                for goal in 0..n {
                    if start == goal {
                        continue;
                    }

                    let mut env = GridWorld::new(cfg.clone());
                    env.reset_to(start, goal);

                    let mut steps = 0u64;
                    loop {
                        let result = env.step(direction);
                        steps += 1;
                        if result.done {
                            assert!(
                                result.info.reached_goal,
                                "n={n} dir={direction:?} start={start} goal={goal}: timed out"
                            );
                            break;
                        }
                    }
                    assert!(
                        steps <= (n - 1) as u64,
                        "n={n} dir={direction:?} start={start} goal={goal}: {steps} steps"
                    );
                }
            }
        }
    }
}

#[test]
fn fixed_direction_visits_every_cell_once_before_repeating() {
    let n = 10usize;
    let cfg = Config::default()
        .with_topology(Topology::Ring)
        .with_grid_size(n);

    for start in 0..n {
        // Goal one cell behind the walk direction: the longest possible
        // successful episode, touring the entire ring.
        let goal = (start + n - 1) % n;
        let mut env = GridWorld::new(cfg.clone());
        env.reset_to(start, goal);

        let mut visited = Vec::new();
        loop {
            let result = env.step(Action::Right);
            visited.push(result.observation.position);
            if result.done {
                break;
            }
        }

        assert_eq!(visited.len(), n - 1, "start={start}");
        let distinct: HashSet<_> = visited.iter().copied().collect();
        assert_eq!(distinct.len(), n - 1, "start={start}: revisited a cell");
        assert!(!distinct.contains(&start), "start={start}: looped back");
        assert_eq!(*visited.last().unwrap(), goal);
    }
}

#[test]
fn commit_succeeds_on_ring_for_every_seed() {
    let cfg = Config::default()
        .with_topology(Topology::Ring)
        .with_grid_size(25);
    let mut runner = EpisodeRunner::new(cfg, Box::new(CommitPolicy::new()), NoopSink);

    for seed in 0..200u64 {
        let summary =
            runner.run_episode(EpisodeConfig::default().with_seed(seed).with_episode_id(seed));
        assert_eq!(
            summary.termination_reason,
            TerminationReason::GoalReached,
            "seed {seed}"
        );
        assert!(summary.steps <= 24, "seed {seed}: {} steps", summary.steps);
    }
}

#[test]
fn commit_pins_against_wall_on_bounded_line() {
    // On the line the same policy is degenerate: walking right past the
    // goal's side ends pinned at the wall until the step limit fires.
    let cfg = Config::default();
    let mut runner = EpisodeRunner::new(
        cfg,
        Box::new(CommitPolicy::with_direction(Action::Right)),
        NoopSink,
    );

    let mut saw_timeout = false;
    for seed in 0..50u64 {
        let summary =
            runner.run_episode(EpisodeConfig::default().with_seed(seed).with_episode_id(seed));
        if summary.goal < summary.start {
            assert_eq!(
                summary.termination_reason,
                TerminationReason::StepLimit,
                "seed {seed}: goal to the left must be unreachable"
            );
            assert_eq!(summary.final_position, 9);
            assert!(summary.total_return < -100.0 + 10.0);
            saw_timeout = true;
        } else {
            assert_eq!(summary.termination_reason, TerminationReason::GoalReached);
        }
    }
    assert!(saw_timeout, "seed range never placed the goal to the left");
}
