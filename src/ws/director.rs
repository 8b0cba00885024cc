//! TD message handlers
//!
//! All handlers in this module run against the connection's own
//! [`DirectorSession`]. Authorization is checked in the dispatch layer.

use crate::camera::DecodeEvent;
use crate::dashboard::{DashboardError, DashboardEvent, DirectorSession};
use crate::protocol::ServerMessage;

/// Translate a dashboard event into what the TD client needs to hear
pub fn event_messages(session: &DirectorSession, event: DashboardEvent) -> Vec<ServerMessage> {
    let mut msgs = Vec::new();
    let notice = event.notice();

    match event {
        DashboardEvent::ScanStarted(config) => msgs.push(ServerMessage::ScanStarted { config }),
        DashboardEvent::ScanStopped => msgs.push(ServerMessage::ScanStopped),
        DashboardEvent::PendingSignIn {
            player,
            matches_game,
            ..
        } => msgs.push(ServerMessage::PendingSignIn {
            player,
            matches_game,
        }),
        DashboardEvent::IntakeFailed(e) => msgs.push(ServerMessage::IntakeError {
            code: e.code().to_string(),
            msg: e.to_string(),
            manual_input: session.intake().manual_input().to_string(),
        }),
        DashboardEvent::PlayerApproved(_) => {
            msgs.push(ServerMessage::PendingCleared);
            msgs.push(ServerMessage::queue_state(session.queue()));
        }
        DashboardEvent::PlayerRejected(_) => msgs.push(ServerMessage::PendingCleared),
        DashboardEvent::PlayerRemoved(_) => {
            msgs.push(ServerMessage::queue_state(session.queue()))
        }
    }

    if let Some(notice) = notice {
        msgs.push(ServerMessage::Notice { notice });
    }
    msgs
}

/// Messages for everything a finished scan produced, in order
pub fn scan_messages(session: &DirectorSession, events: Vec<DashboardEvent>) -> Vec<ServerMessage> {
    events
        .into_iter()
        .flat_map(|event| event_messages(session, event))
        .collect()
}

fn dashboard_error(e: DashboardError) -> Vec<ServerMessage> {
    vec![ServerMessage::error(e.code(), e.to_string())]
}

fn outcome(
    session: &DirectorSession,
    result: Result<DashboardEvent, DashboardError>,
) -> Vec<ServerMessage> {
    match result {
        Ok(event) => event_messages(session, event),
        Err(e) => dashboard_error(e),
    }
}

pub async fn handle_start_scan(session: &mut DirectorSession) -> Vec<ServerMessage> {
    match session.start_scan().await {
        Ok(Some(event)) => event_messages(session, event),
        // Already scanning: nothing changes
        Ok(None) => Vec::new(),
        Err(e) => event_messages(session, DashboardEvent::IntakeFailed(e)),
    }
}

pub async fn handle_stop_scan(session: &mut DirectorSession) -> Vec<ServerMessage> {
    match session.stop_scan().await {
        Some(event) => event_messages(session, event),
        None => Vec::new(),
    }
}

/// Forward a client-side decode into the running scan. The result arrives
/// through [`DirectorSession::next_scan_events`].
pub fn handle_scan_decoded(session: &mut DirectorSession, text: String) -> Vec<ServerMessage> {
    if !session.camera().feed(DecodeEvent::Decoded(text)) {
        tracing::debug!("Ignoring decoded text, no scan is running");
    }
    Vec::new()
}

pub fn handle_scan_frame_error(session: &mut DirectorSession, msg: String) -> Vec<ServerMessage> {
    session.camera().feed(DecodeEvent::FrameError(msg));
    Vec::new()
}

/// The client's camera is gone. Any running scan ends through the session's
/// scan events; manual paste keeps working.
pub fn handle_camera_failed(session: &mut DirectorSession, reason: String) -> Vec<ServerMessage> {
    tracing::warn!(
        "TD camera unavailable for game {}: {}",
        session.game().id,
        reason
    );
    session.camera().mark_unavailable(reason.clone());
    let event = session.camera_failed(reason);
    event_messages(session, event)
}

pub fn handle_camera_ready(session: &mut DirectorSession) -> Vec<ServerMessage> {
    session.camera().mark_available();
    Vec::new()
}

pub fn handle_paste(session: &mut DirectorSession, text: String) -> Vec<ServerMessage> {
    let event = session.paste(text);
    event_messages(session, event)
}

pub fn handle_simulate_scan(session: &mut DirectorSession) -> Vec<ServerMessage> {
    let result = session.simulate_scan();
    outcome(session, result)
}

pub fn handle_approve(session: &mut DirectorSession) -> Vec<ServerMessage> {
    let result = session.approve_pending();
    outcome(session, result)
}

pub fn handle_reject(session: &mut DirectorSession) -> Vec<ServerMessage> {
    let result = session.reject_pending();
    outcome(session, result)
}

pub fn handle_remove_player(session: &mut DirectorSession, player_id: String) -> Vec<ServerMessage> {
    let result = session.remove_player(&player_id);
    outcome(session, result)
}
