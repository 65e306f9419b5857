//! In-memory state of the tournament open for joining.

use std::collections::HashMap;

use backer_shared::{PlayerId, Points, TournamentId};

use super::funding::FundingRecord;

/// The single tournament an engine accepts joins for.
#[derive(Debug, Clone)]
pub struct ActiveTournament {
    /// Tournament id.
    pub id: TournamentId,
    /// Entry deposit.
    pub deposit: Points,
    joined: Vec<PlayerId>,
    funding: HashMap<PlayerId, FundingRecord>,
}

impl ActiveTournament {
    /// Starts tracking a freshly announced tournament.
    #[must_use]
    pub fn new(id: TournamentId, deposit: Points) -> Self {
        Self {
            id,
            deposit,
            joined: Vec::new(),
            funding: HashMap::new(),
        }
    }

    /// Joined players in join order.
    #[must_use]
    pub fn joined(&self) -> &[PlayerId] {
        &self.joined
    }

    /// Returns true if the player already joined.
    #[must_use]
    pub fn has_joined(&self, player_id: &PlayerId) -> bool {
        self.joined.contains(player_id)
    }

    /// Funding of a joined player, if they entered with backers.
    #[must_use]
    pub fn funding_of(&self, player_id: &PlayerId) -> Option<&FundingRecord> {
        self.funding.get(player_id)
    }

    /// Records a completed join.
    pub fn record_join(&mut self, player_id: PlayerId, funding: Option<FundingRecord>) {
        if let Some(record) = funding {
            self.funding.insert(player_id.clone(), record);
        }
        self.joined.push(player_id);
    }
}

/// Tournament lifecycle state guarded by the engine lock.
#[derive(Debug, Default)]
pub struct TournamentState {
    /// Open tournament, `None` between settlement and the next announcement.
    pub active: Option<ActiveTournament>,
}
