use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(UserId)
    }
}

/// Symmetric relation key. Always holds the smaller id first, so one
/// friendship maps to exactly one row whichever side created it.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct UserPair(UserId, UserId);

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    pub fn low(&self) -> UserId {
        self.0
    }

    pub fn high(&self) -> UserId {
        self.1
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.0 == user || self.1 == user
    }

    /// The member of the pair that is not `user`.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if self.0 == user {
            Some(self.1)
        } else if self.1 == user {
            Some(self.0)
        } else {
            None
        }
    }
}

/// Display projection of an account, owned by the account subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub nick_name: String,
    pub avatar: String,
}

impl UserSummary {
    pub fn bare(user_id: UserId) -> Self {
        Self {
            user_id,
            user_name: String::new(),
            nick_name: String::new(),
            avatar: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_canonical_in_both_directions() {
        let forward = UserPair::new(UserId(9), UserId(3));
        let backward = UserPair::new(UserId(3), UserId(9));

        assert_eq!(forward, backward);
        assert_eq!(forward.low(), UserId(3));
        assert_eq!(forward.high(), UserId(9));
    }

    #[test]
    fn other_side_of_pair() {
        let pair = UserPair::new(UserId(1), UserId(2));

        assert_eq!(pair.other(UserId(1)), Some(UserId(2)));
        assert_eq!(pair.other(UserId(2)), Some(UserId(1)));
        assert_eq!(pair.other(UserId(7)), None);
        assert!(!pair.contains(UserId(7)));
    }
}
