//! Consensus badges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Support level of an item across voters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// No notable support.
    None,
    /// At least 75% of voters.
    Favorite,
    /// At least 50% of voters.
    Popular,
    /// More than one voter.
    Consensus,
}

impl Badge {
    /// Return the badge as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Favorite => "favorite",
            Self::Popular => "popular",
            Self::Consensus => "consensus",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the badge for an item; the first matching rule wins.
pub fn popularity_badge(count: usize, percentage: u32) -> Badge {
    if count == 0 {
        Badge::None
    } else if percentage >= 75 {
        Badge::Favorite
    } else if percentage >= 50 {
        Badge::Popular
    } else if count > 1 {
        Badge::Consensus
    } else {
        Badge::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_precedence() {
        assert_eq!(popularity_badge(4, 80), Badge::Favorite);
        assert_eq!(popularity_badge(2, 60), Badge::Popular);
        assert_eq!(popularity_badge(2, 40), Badge::Consensus);
        assert_eq!(popularity_badge(1, 40), Badge::None);
        assert_eq!(popularity_badge(0, 0), Badge::None);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(popularity_badge(3, 75), Badge::Favorite);
        assert_eq!(popularity_badge(1, 74), Badge::Popular);
        assert_eq!(popularity_badge(1, 50), Badge::Popular);
        assert_eq!(popularity_badge(1, 100), Badge::Favorite);
    }
}
