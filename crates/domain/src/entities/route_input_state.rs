//! Route input stages

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which part of the route form is currently being edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteInputState {
    /// Nothing entered yet, start field focused
    #[default]
    Idle,
    /// Start field being edited
    EditingStart,
    /// Start confirmed, end field being edited
    EditingEnd,
    /// Both endpoints confirmed; waypoints and route confirmation available
    Summary,
}

impl RouteInputState {
    /// Whether waypoint editing and route confirmation are available
    #[must_use]
    pub const fn is_summary(self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl fmt::Display for RouteInputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::EditingStart => "editing_start",
            Self::EditingEnd => "editing_end",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(RouteInputState::default(), RouteInputState::Idle);
    }

    #[test]
    fn display_matches_serde_name() {
        let json = serde_json::to_string(&RouteInputState::EditingEnd).unwrap();
        assert_eq!(json, "\"editing_end\"");
        assert_eq!(RouteInputState::EditingEnd.to_string(), "editing_end");
    }
}
