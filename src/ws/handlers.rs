//! WebSocket message dispatch
//!
//! This module provides the main entry point for handling client messages.
//! The connection's role is checked here, then dispatched to role-specific handler modules.

use crate::dashboard::{DashboardEvent, DirectorSession};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Role;

use super::{director, player, player::PlayerConnection};

/// Per-socket state. Nothing here is shared between connections.
pub enum Connection {
    Player(PlayerConnection),
    Director(DirectorSession),
}

impl Connection {
    pub fn role(&self) -> Role {
        match self {
            Connection::Player(_) => Role::Player,
            Connection::Director(_) => Role::Director,
        }
    }

    /// Events ending a running scan. Never resolves for players or while idle.
    pub async fn next_scan_events(&mut self) -> Vec<DashboardEvent> {
        match self {
            Connection::Director(session) => session.next_scan_events().await,
            Connection::Player(_) => std::future::pending().await,
        }
    }

    /// Release everything the connection holds
    pub async fn close(&mut self) {
        match self {
            Connection::Director(session) => session.close().await,
            Connection::Player(conn) => conn.close(),
        }
    }
}

/// Unwrap the player side of the connection or return early with an error
macro_rules! as_player {
    ($conn:expr, $action:expr) => {
        match $conn {
            Connection::Player(p) => p,
            Connection::Director(_) => {
                return vec![ServerMessage::error(
                    "UNAUTHORIZED",
                    format!("Only players can {}", $action),
                )]
            }
        }
    };
}

/// Unwrap the TD side of the connection or return early with an error
macro_rules! as_director {
    ($conn:expr, $action:expr) => {
        match $conn {
            Connection::Director(session) => session,
            Connection::Player(_) => {
                return vec![ServerMessage::error(
                    "UNAUTHORIZED",
                    format!("Only the TD can {}", $action),
                )]
            }
        }
    };
}

/// Handle client messages and return the responses, in order
pub async fn handle_message(
    msg: ClientMessage,
    conn: &mut Connection,
    state: &AppState,
) -> Vec<ServerMessage> {
    match msg {
        // Player messages
        ClientMessage::OpenSignIn {
            game_id,
            player_name,
        } => {
            let p = as_player!(conn, "sign in");
            player::handle_open_sign_in(p, state, game_id, player_name)
        }
        ClientMessage::SetFoodDrinkAmount { amount } => {
            player::handle_set_amount(as_player!(conn, "edit a sign-in"), amount)
        }
        ClientMessage::SetFoodDrinkInput { text } => {
            player::handle_set_input(as_player!(conn, "edit a sign-in"), text)
        }
        ClientMessage::StepFoodDrink { step } => {
            player::handle_step(as_player!(conn, "edit a sign-in"), step)
        }
        ClientMessage::MaxFoodDrink => player::handle_max(as_player!(conn, "edit a sign-in")),
        ClientMessage::RequestVip => {
            player::handle_request_vip(as_player!(conn, "edit a sign-in"))
        }
        ClientMessage::ConfirmVip => {
            player::handle_confirm_vip(as_player!(conn, "edit a sign-in"))
        }
        ClientMessage::DisableVip => {
            player::handle_disable_vip(as_player!(conn, "edit a sign-in"))
        }
        ClientMessage::SetDealer { enabled } => {
            player::handle_set_dealer(as_player!(conn, "edit a sign-in"), enabled)
        }
        ClientMessage::CompleteSignIn => {
            player::handle_complete_sign_in(as_player!(conn, "complete a sign-in"))
        }
        ClientMessage::CloseSignIn => {
            player::handle_close_sign_in(as_player!(conn, "close a sign-in"))
        }

        // TD messages
        ClientMessage::StartScan => {
            director::handle_start_scan(as_director!(conn, "start scanning")).await
        }
        ClientMessage::StopScan => {
            director::handle_stop_scan(as_director!(conn, "stop scanning")).await
        }
        ClientMessage::ScanDecoded { text } => {
            director::handle_scan_decoded(as_director!(conn, "feed the scanner"), text)
        }
        ClientMessage::ScanFrameError { msg } => {
            director::handle_scan_frame_error(as_director!(conn, "feed the scanner"), msg)
        }
        ClientMessage::CameraFailed { reason } => {
            director::handle_camera_failed(as_director!(conn, "report camera state"), reason)
        }
        ClientMessage::CameraReady => {
            director::handle_camera_ready(as_director!(conn, "report camera state"))
        }
        ClientMessage::PastePayload { text } => {
            director::handle_paste(as_director!(conn, "paste sign-ins"), text)
        }
        ClientMessage::SimulateScan => {
            director::handle_simulate_scan(as_director!(conn, "simulate scans"))
        }
        ClientMessage::ApprovePending => {
            director::handle_approve(as_director!(conn, "approve sign-ins"))
        }
        ClientMessage::RejectPending => {
            director::handle_reject(as_director!(conn, "reject sign-ins"))
        }
        ClientMessage::RemovePlayer { player_id } => {
            director::handle_remove_player(as_director!(conn, "remove players"), player_id)
        }
    }
}
