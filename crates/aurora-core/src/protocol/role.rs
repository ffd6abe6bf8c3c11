use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout;

/// Position of a frame inside its group, taken from the role marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Single-frame group (`T`).
    Solo,
    /// Opens a multi-frame group (`R`).
    First,
    /// Any marker that is neither first nor last.
    Middle { marker: u8 },
    /// Closes a multi-frame group (`S`).
    Last,
}

impl Role {
    pub fn from_marker(marker: u8) -> Self {
        match marker {
            layout::ROLE_SOLO => Role::Solo,
            layout::ROLE_FIRST => Role::First,
            layout::ROLE_LAST => Role::Last,
            marker => Role::Middle { marker },
        }
    }

    pub fn marker(self) -> u8 {
        match self {
            Role::Solo => layout::ROLE_SOLO,
            Role::First => layout::ROLE_FIRST,
            Role::Middle { marker } => marker,
            Role::Last => layout::ROLE_LAST,
        }
    }

    /// A group may only start with this frame.
    pub fn is_first(self) -> bool {
        matches!(self, Role::Solo | Role::First)
    }

    /// This frame completes the group.
    pub fn is_last(self) -> bool {
        matches!(self, Role::Solo | Role::Last)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Solo => write!(f, "solo"),
            Role::First => write!(f, "first"),
            Role::Middle { marker } => write!(f, "middle ({marker:#04x})"),
            Role::Last => write!(f, "last"),
        }
    }
}
