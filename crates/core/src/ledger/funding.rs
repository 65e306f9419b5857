//! Split arithmetic for backed entries and shared prizes.
//!
//! Both splits divide by `backers + 1` (the backed player counts as one
//! share) with floor division. The remainder is neither collected nor paid.

use backer_shared::{PlayerId, Points};

/// Backers of one joined player and what each of them paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingRecord {
    /// Backers in the order the join listed them.
    pub backers: Vec<PlayerId>,
    /// Amount each backer and the player paid towards the deposit.
    pub contribution: Points,
}

/// Number of equal shares when `backers` players back one entrant.
fn shares(backers: usize) -> Points {
    Points::try_from(backers).map_or(Points::MAX, |n| n.saturating_add(1))
}

/// Per-head contribution to a deposit split between a player and `backers`.
#[must_use]
pub fn entry_contribution(deposit: Points, backers: usize) -> Points {
    deposit / shares(backers)
}

/// Per-head share of a prize split between a winner and their `backers`.
#[must_use]
pub fn prize_share(total_prize: Points, backers: usize) -> Points {
    total_prize / shares(backers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_contribution_even_split() {
        assert_eq!(entry_contribution(1000, 3), 250);
        assert_eq!(entry_contribution(1000, 1), 500);
    }

    #[test]
    fn test_entry_contribution_drops_remainder() {
        // 1000 / 3 = 333, one point of the deposit is never collected
        assert_eq!(entry_contribution(1000, 2), 333);
        assert_eq!(entry_contribution(10, 20), 0);
    }

    #[test]
    fn test_no_backers_means_whole_amount() {
        assert_eq!(entry_contribution(1000, 0), 1000);
        assert_eq!(prize_share(2000, 0), 2000);
    }

    #[test]
    fn test_prize_share() {
        assert_eq!(prize_share(2000, 3), 500);
        assert_eq!(prize_share(2000, 2), 666);
    }
}
