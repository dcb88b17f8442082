//! Account role types.

use serde::{Deserialize, Serialize};

/// Account permission level.
///
/// Wire format: `u8` (0 = User, 1 = Moderator). Persisted as `smallint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User = 0,
    Moderator = 1,
}

impl Role {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Moderator),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}
