// src/logging.rs
//
// Telemetry sinks for gridline.
// - EventSink: trait used by the episode runner
// - NoopSink:  discards all events
// - FileSink:  writes one JSON line per step for offline analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observation::Observation;
use crate::types::Action;

/// Per-step record written by the JSONL sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Observation schema version.
    pub obs_version: u32,
    pub episode_id: u64,
    pub step: u64,
    pub position: usize,
    pub action: Action,
    pub reward: f64,
    pub done: bool,
}

/// Abstract sink for per-step telemetry.
pub trait EventSink {
    fn log_step(
        &mut self,
        episode_id: u64,
        obs: &Observation,
        action: Action,
        reward: f64,
        done: bool,
    );
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log_step(
        &mut self,
        _episode_id: u64,
        _obs: &Observation,
        _action: Action,
        _reward: f64,
        _done: bool,
    ) {
        // intentionally no-op
    }
}

/// JSONL file sink.
///
/// Each step is written as a single JSON object on its own line.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl EventSink for FileSink {
    fn log_step(
        &mut self,
        episode_id: u64,
        obs: &Observation,
        action: Action,
        reward: f64,
        done: bool,
    ) {
        let record = StepRecord {
            obs_version: obs.obs_version,
            episode_id,
            step: obs.steps_taken,
            position: obs.position,
            action,
            reward,
            done,
        };

        // If logging fails we don't want to crash the harness,
        // so I/O errors are deliberately ignored.
        if let Ok(line) = serde_json::to_string(&record) {
            let _ = self.writer.write_all(line.as_bytes());
            let _ = self.writer.write_all(b"\n");
            let _ = self.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_file_sink_writes_parsable_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.jsonl");

        let cfg = Config::default();
        let mut sink = FileSink::create(&path).unwrap();
        let obs = Observation::from_position(&cfg, 3, 1);
        sink.log_step(7, &obs, Action::Right, -0.1, false);
        let obs = Observation::from_position(&cfg, 4, 2);
        sink.log_step(7, &obs, Action::Right, 10.0, true);
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        let records: Vec<StepRecord> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].episode_id, 7);
        assert_eq!(records[0].position, 3);
        assert!(records[1].done);
        assert_eq!(records[1].reward, 10.0);
    }
}
