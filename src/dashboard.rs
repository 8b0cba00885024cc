//! Tournament director dashboard session
//!
//! One session per TD view of a game: it owns the intake, the scanner and
//! the approval queue, and lives exactly as long as the view. Every operator
//! action returns a [`DashboardEvent`] the presentation layer can render.

use crate::camera::{Camera, RemoteCamera, ScanConfig};
use crate::catalog::PokerGame;
use crate::intake::scanner::ScanEvent;
use crate::intake::{self, Intake, IntakeError, ScanStart, Scanner};
use crate::queue::{ApprovalQueue, QueueError};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("No sign-in is awaiting review")]
    NoPendingSignIn,

    #[error("Simulated scans are disabled")]
    SimulationDisabled,

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::NoPendingSignIn => "NO_PENDING_SIGN_IN",
            DashboardError::SimulationDisabled => "SIMULATION_DISABLED",
            DashboardError::Queue(QueueError::AlreadySignedIn(_)) => "ALREADY_SIGNED_IN",
            DashboardError::Queue(QueueError::Removed(_)) => "PLAYER_REMOVED",
            DashboardError::Queue(QueueError::NotFound(_)) => "PLAYER_NOT_FOUND",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A short message for the operator (rendered as a toast by the client)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>, variant: NoticeVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    ScanStarted(ScanConfig),
    ScanStopped,
    /// A sign-in now awaits review (replacing any earlier one)
    PendingSignIn {
        player: PendingPlayer,
        matches_game: bool,
        simulated: bool,
    },
    IntakeFailed(IntakeError),
    PlayerApproved(PendingPlayer),
    PlayerRejected(PendingPlayer),
    PlayerRemoved(PendingPlayer),
}

impl DashboardEvent {
    /// Operator notice for this event, if it warrants one
    pub fn notice(&self) -> Option<Notice> {
        match self {
            DashboardEvent::ScanStarted(_) | DashboardEvent::ScanStopped => None,
            DashboardEvent::PendingSignIn { simulated, .. } => simulated.then(|| {
                Notice::new(
                    "QR Code Scanned",
                    "Player data loaded successfully.",
                    NoticeVariant::Default,
                )
            }),
            DashboardEvent::IntakeFailed(IntakeError::CameraUnavailable(reason)) => {
                Some(Notice::new(
                    "Camera Unavailable",
                    format!("{}. Paste the QR data manually instead.", reason),
                    NoticeVariant::Destructive,
                ))
            }
            DashboardEvent::IntakeFailed(_) => Some(Notice::new(
                "Scan Failed",
                "Invalid QR code data. Please try again.",
                NoticeVariant::Destructive,
            )),
            DashboardEvent::PlayerApproved(player) => Some(Notice::new(
                "Player Approved",
                format!("{} has been added to the game.", player.name),
                NoticeVariant::Default,
            )),
            DashboardEvent::PlayerRejected(_) => Some(Notice::new(
                "Player Rejected",
                "Sign-in request was declined.",
                NoticeVariant::Destructive,
            )),
            DashboardEvent::PlayerRemoved(_) => Some(Notice::new(
                "Player Removed",
                "Player has been removed from the game.",
                NoticeVariant::Default,
            )),
        }
    }
}

pub struct DirectorSession<C: Camera + ?Sized = RemoteCamera> {
    game: &'static PokerGame,
    camera: Arc<C>,
    scanner: Scanner<C>,
    intake: Intake,
    queue: ApprovalQueue,
    allow_simulated_scan: bool,
}

impl<C: Camera + ?Sized> DirectorSession<C> {
    pub fn new(
        game: &'static PokerGame,
        camera: Arc<C>,
        scan_config: ScanConfig,
        allow_simulated_scan: bool,
    ) -> Self {
        Self {
            game,
            scanner: Scanner::new(camera.clone(), scan_config),
            camera,
            intake: Intake::new(),
            queue: ApprovalQueue::new(game.id.to_string()),
            allow_simulated_scan,
        }
    }

    pub fn game(&self) -> &'static PokerGame {
        self.game
    }

    pub fn camera(&self) -> &Arc<C> {
        &self.camera
    }

    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    pub fn queue(&self) -> &ApprovalQueue {
        &self.queue
    }

    pub fn is_scanning(&self) -> bool {
        self.scanner.is_active()
    }

    /// Start the camera scan. A second start while running changes nothing.
    pub async fn start_scan(&mut self) -> Result<Option<DashboardEvent>, IntakeError> {
        match self.scanner.start().await {
            Ok(ScanStart::Started(config)) => Ok(Some(DashboardEvent::ScanStarted(config))),
            Ok(ScanStart::AlreadyActive) => Ok(None),
            Err(e) => {
                let error = IntakeError::from(e);
                tracing::warn!("Scan for game {} could not start: {}", self.game.id, error);
                self.intake.camera_failed(error.clone());
                Err(error)
            }
        }
    }

    /// Stop the camera scan; a no-op when idle
    pub async fn stop_scan(&mut self) -> Option<DashboardEvent> {
        if !self.scanner.is_active() {
            return None;
        }
        self.scanner.stop().await;
        Some(DashboardEvent::ScanStopped)
    }

    /// Wait for the running scan to finish. Never resolves while idle.
    ///
    /// Always starts with `ScanStopped` so the client releases its camera. A
    /// decode is followed by its review (or intake failure) event.
    pub async fn next_scan_events(&mut self) -> Vec<DashboardEvent> {
        match self.scanner.next_event().await {
            ScanEvent::Decoded(text) => {
                vec![DashboardEvent::ScanStopped, self.review(&text, false)]
            }
            ScanEvent::Ended => vec![DashboardEvent::ScanStopped],
        }
    }

    /// The camera went away after the scan was requested. Manual entry stays open.
    pub fn camera_failed(&mut self, reason: String) -> DashboardEvent {
        let error = IntakeError::CameraUnavailable(reason);
        self.intake.camera_failed(error.clone());
        DashboardEvent::IntakeFailed(error)
    }

    /// Parse pasted text. The text stays in the manual input on failure.
    pub fn paste(&mut self, text: String) -> DashboardEvent {
        self.intake.set_manual_input(text);
        match self.intake.submit_manual() {
            Ok(player) => {
                let player = player.clone();
                self.pending_event(player, false)
            }
            Err(e) => DashboardEvent::IntakeFailed(e),
        }
    }

    /// Load the sample payload as if it had been scanned
    pub fn simulate_scan(&mut self) -> Result<DashboardEvent, DashboardError> {
        if !self.allow_simulated_scan {
            return Err(DashboardError::SimulationDisabled);
        }
        Ok(self.review(&intake::sample_payload(), true))
    }

    /// Approve the sign-in awaiting review
    pub fn approve_pending(&mut self) -> Result<DashboardEvent, DashboardError> {
        let player = self
            .intake
            .take_pending()
            .ok_or(DashboardError::NoPendingSignIn)?;
        let approved = self.queue.approve(player)?.clone();
        Ok(DashboardEvent::PlayerApproved(approved))
    }

    /// Discard the sign-in awaiting review
    pub fn reject_pending(&mut self) -> Result<DashboardEvent, DashboardError> {
        let mut player = self
            .intake
            .take_pending()
            .ok_or(DashboardError::NoPendingSignIn)?;
        player.status = SignInStatus::Rejected;
        tracing::info!("Rejected sign-in {} for game {}", player.id, self.game.id);
        Ok(DashboardEvent::PlayerRejected(player))
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<DashboardEvent, DashboardError> {
        let player = self.queue.remove(player_id)?;
        Ok(DashboardEvent::PlayerRemoved(player))
    }

    /// Tear the session down. The camera is released before anything else.
    pub async fn close(&mut self) {
        self.scanner.stop().await;
        self.intake = Intake::new();
        self.queue = ApprovalQueue::new(self.game.id.to_string());
        tracing::info!("Closed TD session for game {}", self.game.id);
    }

    fn review(&mut self, text: &str, simulated: bool) -> DashboardEvent {
        match self.intake.accept(text) {
            Ok(player) => {
                let player = player.clone();
                self.pending_event(player, simulated)
            }
            Err(e) => DashboardEvent::IntakeFailed(e),
        }
    }

    fn pending_event(&self, player: PendingPlayer, simulated: bool) -> DashboardEvent {
        let matches_game = player.game_id == self.game.id;
        if !matches_game {
            tracing::warn!(
                "Sign-in {} is for game {} but this dashboard runs game {}",
                player.id,
                player.game_id,
                self.game.id
            );
        }
        DashboardEvent::PendingSignIn {
            player,
            matches_game,
            simulated,
        }
    }
}
