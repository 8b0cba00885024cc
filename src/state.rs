use crate::catalog::Weekday;
use crate::config::ServerConfig;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state.
///
/// Sign-in sessions are owned by their sockets and never shared; this only
/// carries configuration and connection bookkeeping.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub connections: Arc<RwLock<ConnectionCounts>>,
    /// Pins "today" instead of reading the clock
    today_override: Option<Weekday>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            connections: Arc::new(RwLock::new(ConnectionCounts::default())),
            today_override: None,
        }
    }

    /// Use a fixed weekday as "today"
    pub fn with_today(mut self, day: Weekday) -> Self {
        self.today_override = Some(day);
        self
    }

    pub fn today(&self) -> Weekday {
        self.today_override.unwrap_or_else(Weekday::today)
    }

    /// Count a new connection, returns the updated counts
    pub async fn connect(&self, role: Role) -> ConnectionCounts {
        let mut counts = self.connections.write().await;
        match role {
            Role::Player => counts.players += 1,
            Role::Director => counts.directors += 1,
        }
        counts.clone()
    }

    pub async fn disconnect(&self, role: Role) -> ConnectionCounts {
        let mut counts = self.connections.write().await;
        match role {
            Role::Player => counts.players = counts.players.saturating_sub(1),
            Role::Director => counts.directors = counts.directors.saturating_sub(1),
        }
        counts.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_counts() {
        let state = AppState::default();
        state.connect(Role::Player).await;
        state.connect(Role::Director).await;
        let counts = state.connect(Role::Player).await;
        assert_eq!(counts.players, 2);
        assert_eq!(counts.directors, 1);

        state.disconnect(Role::Director).await;
        let counts = state.disconnect(Role::Director).await;
        assert_eq!(counts.directors, 0);
    }

    #[test]
    fn test_today_override() {
        let state = AppState::default().with_today(Weekday::Thu);
        assert_eq!(state.today(), Weekday::Thu);
    }
}
