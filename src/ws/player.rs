//! Player message handlers
//!
//! A player connection owns at most one open composer at a time.

use crate::catalog::{self, USER_PROFILE};
use crate::composer::{Composer, Step, VipRequest};
use crate::protocol::ServerMessage;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct PlayerConnection {
    composer: Option<Composer>,
}

impl PlayerConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composer(&self) -> Option<&Composer> {
        self.composer.as_ref()
    }

    /// Reset and drop the open composer, if any
    pub fn close(&mut self) {
        if let Some(mut composer) = self.composer.take() {
            composer.close();
        }
    }

    fn composer_mut(&mut self) -> Result<&mut Composer, ServerMessage> {
        self.composer
            .as_mut()
            .ok_or_else(|| ServerMessage::error("NO_SIGN_IN_OPEN", "Open a sign-in first"))
    }
}

/// Edit the open composer and report its new state
fn edit(conn: &mut PlayerConnection, apply: impl FnOnce(&mut Composer)) -> Vec<ServerMessage> {
    match conn.composer_mut() {
        Ok(composer) => {
            apply(composer);
            vec![ServerMessage::composer_state(composer)]
        }
        Err(e) => vec![e],
    }
}

pub fn handle_open_sign_in(
    conn: &mut PlayerConnection,
    state: &AppState,
    game_id: String,
    player_name: Option<String>,
) -> Vec<ServerMessage> {
    let Some(game) = catalog::find_game(&game_id) else {
        return vec![ServerMessage::error(
            "GAME_NOT_FOUND",
            format!("Game {} not found", game_id),
        )];
    };

    let today = state.today();
    if state.config.enforce_game_day && !game.is_on(today) {
        return vec![ServerMessage::error(
            "NOT_GAME_DAY",
            format!(
                "Sign-in for {} opens on {}",
                game.venue_name,
                game.day.as_str()
            ),
        )];
    }

    let player_name = player_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| USER_PROFILE.name.to_string());

    tracing::info!("Sign-in opened for game {} ({})", game.id, game.venue_name);
    let composer = conn.composer.insert(Composer::new(
        game.id.to_string(),
        game.venue_name.to_string(),
        Some(player_name),
        state.config.vip_membership_url.clone(),
    ));
    vec![ServerMessage::composer_state(composer)]
}

pub fn handle_set_amount(conn: &mut PlayerConnection, amount: i64) -> Vec<ServerMessage> {
    edit(conn, |c| c.set_food_drink_amount(amount))
}

pub fn handle_set_input(conn: &mut PlayerConnection, text: String) -> Vec<ServerMessage> {
    edit(conn, |c| c.set_food_drink_input(&text))
}

pub fn handle_step(conn: &mut PlayerConnection, step: Step) -> Vec<ServerMessage> {
    edit(conn, |c| c.step_food_drink(step))
}

pub fn handle_max(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    edit(conn, Composer::max_food_drink)
}

pub fn handle_request_vip(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    match conn.composer_mut() {
        Ok(composer) => match composer.request_vip() {
            VipRequest::ConfirmationRequired { membership_url } => {
                vec![ServerMessage::VipConfirmationRequired { membership_url }]
            }
            VipRequest::AlreadyEnabled => vec![ServerMessage::composer_state(composer)],
        },
        Err(e) => vec![e],
    }
}

pub fn handle_confirm_vip(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    edit(conn, Composer::confirm_vip)
}

pub fn handle_disable_vip(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    edit(conn, Composer::disable_vip)
}

pub fn handle_set_dealer(conn: &mut PlayerConnection, enabled: bool) -> Vec<ServerMessage> {
    edit(conn, |c| c.set_dealer(enabled))
}

pub fn handle_complete_sign_in(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    let composer = match conn.composer_mut() {
        Ok(c) => c,
        Err(e) => return vec![e],
    };

    match composer.submit() {
        Ok(payload) => vec![
            ServerMessage::SignInReady { payload },
            ServerMessage::composer_state(composer),
        ],
        Err(e) => {
            tracing::error!("Failed to build sign-in payload: {}", e);
            vec![ServerMessage::error("PAYLOAD_FAILED", e.to_string())]
        }
    }
}

pub fn handle_close_sign_in(conn: &mut PlayerConnection) -> Vec<ServerMessage> {
    conn.close();
    vec![ServerMessage::SignInClosed]
}
