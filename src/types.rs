// src/types.rs
//
// Shared primitive types for the gridline harness.

use serde::{Deserialize, Serialize};

/// Index of a cell on the 1-D grid, always in `[0, grid_size)`.
pub type Position = usize;

/// The two moves available to an agent on a 1-D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
}

impl Action {
    /// Stable lowercase name (used in logs/telemetry).
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    pub fn opposite(&self) -> Action {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    /// Signed step direction: -1 for Left, +1 for Right.
    pub fn delta(&self) -> i64 {
        match self {
            Action::Left => -1,
            Action::Right => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_opposite_roundtrip() {
        assert_eq!(Action::Left.opposite(), Action::Right);
        assert_eq!(Action::Right.opposite().opposite(), Action::Right);
    }

    #[test]
    fn test_action_delta_signs() {
        assert_eq!(Action::Left.delta(), -1);
        assert_eq!(Action::Right.delta(), 1);
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Left).unwrap();
        let parsed: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Action::Left);
    }
}
