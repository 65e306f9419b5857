//! Ledger engine: accounts, tournament lifecycle, backed joins and settlement.
//!
//! Every public operation takes the same async lock for its whole duration,
//! store I/O included, so operations are linearizable with respect to each
//! other. Multi-account writes go to the store as one commit and the
//! in-memory state only changes after the commit succeeded.

use std::sync::Arc;

use backer_shared::{PlayerId, Points, TournamentId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::LedgerError;
use super::funding::{FundingRecord, entry_contribution};
use super::memory::MemoryStore;
use super::settlement::{payouts, select_winner};
use super::state::{ActiveTournament, TournamentState};
use super::store::{AccountStore, JoinCommit, SettlementCommit, StoreError, Winner};

/// Ledger engine over an [`AccountStore`].
pub struct LedgerEngine {
    store: Arc<dyn AccountStore>,
    state: Mutex<TournamentState>,
}

impl std::fmt::Debug for LedgerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerEngine").finish_non_exhaustive()
    }
}

fn ensure_positive(points: Points) -> Result<(), LedgerError> {
    if points <= 0 {
        return Err(LedgerError::InvalidAmount(points));
    }
    Ok(())
}

impl LedgerEngine {
    /// Creates an engine with no active tournament.
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            state: Mutex::new(TournamentState::default()),
        }
    }

    /// Creates an engine over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Tops up a player, creating the account on first funding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive points and `BalanceOverflow`
    /// if the new balance does not fit.
    pub async fn fund(&self, player_id: &PlayerId, points: Points) -> Result<(), LedgerError> {
        ensure_positive(points)?;
        let _guard = self.state.lock().await;

        match self.store.get_balance(player_id).await {
            Ok(balance) => {
                let updated = balance
                    .checked_add(points)
                    .ok_or_else(|| LedgerError::BalanceOverflow(player_id.clone()))?;
                self.store.set_balance(player_id, updated).await?;
                debug!(player_id = %player_id, points, balance = updated, "Funded player");
            }
            Err(StoreError::PlayerNotFound(_)) => {
                self.store.create_account(player_id, points).await?;
                debug!(player_id = %player_id, points, "Created player account");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Debits a player.
    ///
    /// The balance must stay strictly positive: taking the whole balance is
    /// refused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount`, `PlayerNotFound` or `InsufficientFunds`.
    pub async fn take(&self, player_id: &PlayerId, points: Points) -> Result<(), LedgerError> {
        ensure_positive(points)?;
        let _guard = self.state.lock().await;

        let balance = self.store.get_balance(player_id).await?;
        if balance <= points {
            warn!(player_id = %player_id, balance, points, "Take refused");
            return Err(LedgerError::InsufficientFunds {
                player_id: player_id.clone(),
                available: balance,
                requested: points,
            });
        }

        self.store.set_balance(player_id, balance - points).await?;
        debug!(player_id = %player_id, points, balance = balance - points, "Took points");
        Ok(())
    }

    /// Reads a player's balance.
    ///
    /// # Errors
    ///
    /// Returns `PlayerNotFound` for unknown players.
    pub async fn balance(&self, player_id: &PlayerId) -> Result<Points, LedgerError> {
        let _guard = self.state.lock().await;
        Ok(self.store.get_balance(player_id).await?)
    }

    /// Announces a tournament and opens it for joining.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a non-positive deposit,
    /// `TournamentAlreadyAnnounced` while another tournament is open and
    /// `TournamentExists` if the id was used before.
    pub async fn announce_tournament(
        &self,
        tour_id: TournamentId,
        deposit: Points,
    ) -> Result<(), LedgerError> {
        ensure_positive(deposit)?;
        let mut state = self.state.lock().await;

        if let Some(active) = &state.active {
            warn!(tour_id = %tour_id, active = %active.id, "Announce refused, tournament still open");
            return Err(LedgerError::TournamentAlreadyAnnounced(active.id));
        }

        match self.store.get_tournament(tour_id).await {
            Ok(_) => return Err(LedgerError::TournamentExists(tour_id)),
            Err(StoreError::TournamentNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
        self.store.create_tournament(tour_id, deposit).await?;

        state.active = Some(ActiveTournament::new(tour_id, deposit));
        info!(tour_id = %tour_id, deposit, "Tournament announced");
        Ok(())
    }

    /// Joins the open tournament, alone or backed by other players.
    ///
    /// Alone, the player pays the whole deposit. With backers, the deposit is
    /// split in `backers + 1` equal floor shares; the player needs at least
    /// one share and each backer strictly more than one share.
    ///
    /// # Errors
    ///
    /// Returns `TournamentNotFound`, `TournamentNotActive`, `AlreadyJoined`,
    /// `PlayerNotFound`, `InvalidBacker`, `InvalidQueryResult` or
    /// `InsufficientFunds`.
    pub async fn join_tournament(
        &self,
        tour_id: TournamentId,
        player_id: &PlayerId,
        backers: &[PlayerId],
    ) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;

        let deposit = self.store.get_tournament(tour_id).await?.deposit;
        let active = state
            .active
            .as_mut()
            .filter(|active| active.id == tour_id)
            .ok_or(LedgerError::TournamentNotActive(tour_id))?;
        if active.has_joined(player_id) {
            return Err(LedgerError::AlreadyJoined {
                tour_id,
                player_id: player_id.clone(),
            });
        }

        let balance = self.store.get_balance(player_id).await?;
        let insufficient = |player: &PlayerId, available: Points, requested: Points| {
            warn!(tour_id = %tour_id, player_id = %player, available, requested, "Join refused");
            LedgerError::InsufficientFunds {
                player_id: player.clone(),
                available,
                requested,
            }
        };

        let (balances, funding) = if backers.is_empty() {
            if balance < deposit {
                return Err(insufficient(player_id, balance, deposit));
            }
            (vec![(player_id.clone(), balance - deposit)], None)
        } else {
            let required = entry_contribution(deposit, backers.len());
            if balance < required {
                return Err(insufficient(player_id, balance, required));
            }
            if backers.contains(player_id) {
                return Err(LedgerError::InvalidBacker(player_id.clone()));
            }

            let backer_balances = self.store.get_balances(backers).await?;
            if backer_balances.len() != backers.len() {
                return Err(LedgerError::InvalidQueryResult {
                    requested: backers.len(),
                    found: backer_balances.len(),
                });
            }

            let mut balances = Vec::with_capacity(backers.len() + 1);
            balances.push((player_id.clone(), balance - required));
            for backer in backers {
                let available = backer_balances.get(backer).copied().ok_or(
                    LedgerError::InvalidQueryResult {
                        requested: backers.len(),
                        found: backer_balances.len(),
                    },
                )?;
                if available <= required {
                    return Err(insufficient(backer, available, required));
                }
                balances.push((backer.clone(), available - required));
            }

            let record = FundingRecord {
                backers: backers.to_vec(),
                contribution: required,
            };
            (balances, Some(record))
        };

        self.store
            .commit_join(&JoinCommit {
                tour_id,
                player_id: player_id.clone(),
                balances,
            })
            .await?;

        info!(
            tour_id = %tour_id,
            player_id = %player_id,
            backers = backers.len(),
            contribution = funding.as_ref().map_or(deposit, |f| f.contribution),
            "Player joined tournament"
        );
        active.record_join(player_id.clone(), funding);
        Ok(())
    }

    /// Settles the open tournament and pays the winner and their backers.
    ///
    /// Returns `None` without changing anything when no tournament is open
    /// or nobody joined.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQueryResult` if joined accounts vanished from the
    /// store and `BalanceOverflow` if the pot or a payout does not fit.
    pub async fn result_tournament(&self) -> Result<Option<Winner>, LedgerError> {
        let mut state = self.state.lock().await;

        let Some(active) = state.active.as_ref() else {
            return Ok(None);
        };
        if active.joined().is_empty() {
            return Ok(None);
        }

        let balances = self.store.get_balances(active.joined()).await?;
        if balances.len() != active.joined().len() {
            return Err(LedgerError::InvalidQueryResult {
                requested: active.joined().len(),
                found: balances.len(),
            });
        }
        let Some((winner_id, winner_balance)) = select_winner(active.joined(), &balances) else {
            return Ok(None);
        };

        let total_prize = Points::try_from(active.joined().len())
            .ok()
            .and_then(|entrants| active.deposit.checked_mul(entrants))
            .ok_or_else(|| LedgerError::BalanceOverflow(winner_id.clone()))?;

        let funding = active.funding_of(winner_id);
        let backer_balances = match funding {
            Some(record) => {
                let found = self.store.get_balances(&record.backers).await?;
                if found.len() != record.backers.len() {
                    return Err(LedgerError::InvalidQueryResult {
                        requested: record.backers.len(),
                        found: found.len(),
                    });
                }
                found
            }
            None => std::collections::HashMap::new(),
        };
        let credits = payouts(winner_id, winner_balance, total_prize, funding, &backer_balances)?;

        let winner = Winner {
            player_id: winner_id.clone(),
            prize: total_prize,
        };
        self.store
            .commit_settlement(&SettlementCommit {
                tour_id: active.id,
                winner: winner.clone(),
                balances: credits,
            })
            .await?;

        info!(
            tour_id = %active.id,
            winner = %winner.player_id,
            prize = winner.prize,
            backed = funding.is_some(),
            "Tournament settled"
        );
        state.active = None;
        Ok(Some(winner))
    }

    /// Wipes every account and tournament and closes the open tournament.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store cannot be cleared.
    pub async fn reset(&self) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        self.store.reset().await?;
        state.active = None;
        info!("Ledger reset");
        Ok(())
    }

    /// Snapshot of the open tournament, if any.
    pub async fn active_tournament(&self) -> Option<ActiveTournament> {
        self.state.lock().await.active.clone()
    }
}
