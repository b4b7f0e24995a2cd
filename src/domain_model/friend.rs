use crate::domain_model::{UserId, UserPair};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub user_min: UserId,
    pub user_max: UserId,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    pub fn new(pair: UserPair, created_at: DateTime<Utc>) -> Self {
        Self {
            user_min: pair.low(),
            user_max: pair.high(),
            created_at,
        }
    }

    pub fn pair(&self) -> UserPair {
        UserPair::new(self.user_min, self.user_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn friendship_row_is_canonical() {
        let friendship = Friendship::new(UserPair::new(UserId(8), UserId(2)), Utc::now());

        assert_eq!(friendship.user_min, UserId(2));
        assert_eq!(friendship.user_max, UserId(8));
        assert_eq!(friendship.pair(), UserPair::new(UserId(2), UserId(8)));
    }
}
