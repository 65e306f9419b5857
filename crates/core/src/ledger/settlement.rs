//! Winner selection and prize distribution.

use std::collections::HashMap;

use backer_shared::{PlayerId, Points};

use super::error::LedgerError;
use super::funding::{FundingRecord, prize_share};

/// Picks the joined player with the strictly highest balance.
///
/// Players are scanned in join order and the leader only changes on a
/// strictly greater balance, so ties go to the earliest joiner. Players
/// missing from `balances` are skipped.
#[must_use]
pub fn select_winner<'a>(
    joined: &'a [PlayerId],
    balances: &HashMap<PlayerId, Points>,
) -> Option<(&'a PlayerId, Points)> {
    let mut leader: Option<(&PlayerId, Points)> = None;
    for player in joined {
        let Some(&balance) = balances.get(player) else {
            continue;
        };
        match leader {
            Some((_, best)) if balance <= best => {}
            _ => leader = Some((player, balance)),
        }
    }
    leader
}

/// Computes the new balances paid out by a settlement.
///
/// Without funding the winner takes the whole pot. With funding the pot is
/// split in equal shares between the winner and each backer. Balances are
/// the current ones, which already reflect every join-time debit.
///
/// # Errors
///
/// Returns `InvalidQueryResult` if a backer balance is missing and
/// `BalanceOverflow` if a credit does not fit.
pub fn payouts(
    winner: &PlayerId,
    winner_balance: Points,
    total_prize: Points,
    funding: Option<&FundingRecord>,
    backer_balances: &HashMap<PlayerId, Points>,
) -> Result<Vec<(PlayerId, Points)>, LedgerError> {
    let credit = |player: &PlayerId, balance: Points, amount: Points| {
        balance
            .checked_add(amount)
            .map(|updated| (player.clone(), updated))
            .ok_or_else(|| LedgerError::BalanceOverflow(player.clone()))
    };

    let Some(record) = funding else {
        return Ok(vec![credit(winner, winner_balance, total_prize)?]);
    };

    let share = prize_share(total_prize, record.backers.len());
    let mut result = Vec::with_capacity(record.backers.len() + 1);
    result.push(credit(winner, winner_balance, share)?);
    for backer in &record.backers {
        let balance = backer_balances
            .get(backer)
            .copied()
            .ok_or(LedgerError::InvalidQueryResult {
                requested: record.backers.len(),
                found: backer_balances.len(),
            })?;
        result.push(credit(backer, balance, share)?);
    }
    Ok(result)
}
