//! Approved sign-ins for one game session

use crate::types::*;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Player {0} is already signed in")]
    AlreadySignedIn(PlayerId),

    #[error("Player {0} was removed from this game")]
    Removed(PlayerId),

    #[error("Player {0} not found")]
    NotFound(PlayerId),
}

/// Ordered list of approved players, keyed by id.
///
/// Removal is permanent for the lifetime of the queue: a removed id can't be
/// approved again.
#[derive(Debug, Clone)]
pub struct ApprovalQueue {
    game_id: GameId,
    entries: Vec<PendingPlayer>,
    removed: HashSet<PlayerId>,
}

impl ApprovalQueue {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            entries: Vec::new(),
            removed: HashSet::new(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Approved players in approval order
    pub fn entries(&self) -> &[PendingPlayer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, player_id: &str) -> Option<&PendingPlayer> {
        self.entries.iter().find(|p| p.id == player_id)
    }

    /// Sum of `totalChips` over all approved players
    pub fn total_chips(&self) -> u64 {
        self.entries.iter().map(|p| p.total_chips as u64).sum()
    }

    /// Approve a pending player and append it
    pub fn approve(&mut self, mut player: PendingPlayer) -> Result<&PendingPlayer, QueueError> {
        if self.removed.contains(&player.id) {
            return Err(QueueError::Removed(player.id));
        }
        if self.get(&player.id).is_some() {
            return Err(QueueError::AlreadySignedIn(player.id));
        }

        player.status = SignInStatus::Approved;
        tracing::info!(
            "Approved {} ({}) for game {} with {} chips",
            player.name,
            player.id,
            self.game_id,
            player.total_chips
        );
        self.entries.push(player);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Remove an approved player for good
    pub fn remove(&mut self, player_id: &str) -> Result<PendingPlayer, QueueError> {
        let index = self
            .entries
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| QueueError::NotFound(player_id.to_string()))?;

        let player = self.entries.remove(index);
        self.removed.insert(player.id.clone());
        tracing::info!("Removed {} ({}) from game {}", player.name, player.id, self.game_id);
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::parse_payload;

    fn player(total: u32) -> PendingPlayer {
        parse_payload(&format!(r#"{{"gameId":"7","totalChips":{}}}"#, total)).unwrap()
    }

    #[test]
    fn test_approve_appends_once() {
        let mut queue = ApprovalQueue::new("7".to_string());
        let p = player(1500);

        let approved = queue.approve(p.clone()).unwrap();
        assert_eq!(approved.status, SignInStatus::Approved);
        assert_eq!(queue.len(), 1);

        assert_eq!(
            queue.approve(p.clone()).unwrap_err(),
            QueueError::AlreadySignedIn(p.id.clone())
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_total_chips_and_remove() {
        let mut queue = ApprovalQueue::new("7".to_string());
        let a = player(4000);
        let b = player(0);
        let c = player(1500);
        queue.approve(a.clone()).unwrap();
        queue.approve(b).unwrap();
        queue.approve(c.clone()).unwrap();
        assert_eq!(queue.total_chips(), 5500);

        let removed = queue.remove(&a.id).unwrap();
        assert_eq!(removed.total_chips, 4000);
        assert_eq!(queue.total_chips(), 1500);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.entries()[1].id, c.id);
    }

    #[test]
    fn test_removed_is_permanent() {
        let mut queue = ApprovalQueue::new("7".to_string());
        let p = player(100);
        queue.approve(p.clone()).unwrap();
        queue.remove(&p.id).unwrap();

        assert_eq!(
            queue.remove(&p.id).unwrap_err(),
            QueueError::NotFound(p.id.clone())
        );
        assert_eq!(
            queue.approve(p.clone()).unwrap_err(),
            QueueError::Removed(p.id.clone())
        );
        assert!(queue.is_empty());
    }
}
