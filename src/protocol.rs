use crate::camera::ScanConfig;
use crate::composer::{Composer, Step};
use crate::dashboard::Notice;
use crate::payload::SignInPayload;
use crate::queue::ApprovalQueue;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    // Player (composer) messages
    OpenSignIn {
        game_id: GameId,
        #[serde(default)]
        player_name: Option<String>,
    },
    SetFoodDrinkAmount {
        amount: i64,
    },
    /// Raw text from the amount input field
    SetFoodDrinkInput {
        text: String,
    },
    StepFoodDrink {
        step: Step,
    },
    MaxFoodDrink,
    /// Asks for VIP; answered with a confirmation notice, never enables it
    RequestVip,
    /// VIP membership was confirmed outside the form
    ConfirmVip,
    DisableVip,
    SetDealer {
        enabled: bool,
    },
    CompleteSignIn,
    CloseSignIn,

    // TD (dashboard) messages
    StartScan,
    StopScan,
    /// Text decoded by the client-side camera
    ScanDecoded {
        text: String,
    },
    /// A frame the client-side camera couldn't decode
    ScanFrameError {
        msg: String,
    },
    /// The client couldn't acquire its camera (permission denied, no device)
    CameraFailed {
        reason: String,
    },
    /// The client's camera is usable again
    CameraReady,
    PastePayload {
        text: String,
    },
    SimulateScan,
    ApprovePending,
    RejectPending,
    RemovePlayer {
        player_id: PlayerId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: Role,
        server_now: String,
        /// Game managed by a TD connection
        #[serde(skip_serializing_if = "Option::is_none")]
        game_id: Option<GameId>,
    },
    /// Current composer inputs and derived chips
    ComposerState {
        game_id: GameId,
        venue_name: String,
        is_vip: bool,
        is_dealer: bool,
        chips: ChipBreakdown,
    },
    VipConfirmationRequired {
        membership_url: String,
    },
    /// Generated sign-in for the player to show as QR
    SignInReady {
        payload: SignInPayload,
    },
    SignInClosed,
    /// Tells the TD client to open its camera with this config
    ScanStarted {
        config: ScanConfig,
    },
    ScanStopped,
    PendingSignIn {
        player: PendingPlayer,
        matches_game: bool,
    },
    /// The review slot was emptied
    PendingCleared,
    /// Inline intake error; `manual_input` is what the operator can correct
    IntakeError {
        code: String,
        msg: String,
        manual_input: String,
    },
    QueueState {
        players: Vec<PendingPlayer>,
        signed_in: usize,
        total_chips: u64,
    },
    Notice {
        notice: Notice,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn composer_state(composer: &Composer) -> Self {
        ServerMessage::ComposerState {
            game_id: composer.game_id().to_string(),
            venue_name: composer.venue_name().to_string(),
            is_vip: composer.is_vip(),
            is_dealer: composer.is_dealer(),
            chips: composer.chips(),
        }
    }

    pub fn queue_state(queue: &ApprovalQueue) -> Self {
        ServerMessage::QueueState {
            players: queue.entries().to_vec(),
            signed_in: queue.len(),
            total_chips: queue.total_chips(),
        }
    }

    pub fn error(code: &str, msg: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"step_food_drink","step":"up"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::StepFoodDrink { step: Step::Up }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"open_sign_in","game_id":"7"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::OpenSignIn { ref game_id, player_name: None } if game_id == "7"
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"t":"approve_pending"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::ApprovePending));
    }

    #[test]
    fn test_server_message_shape() {
        let json = serde_json::to_value(ServerMessage::error("BAD", "nope")).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "BAD");

        let queue = ApprovalQueue::new("7".to_string());
        let json = serde_json::to_value(ServerMessage::queue_state(&queue)).unwrap();
        assert_eq!(json["t"], "queue_state");
        assert_eq!(json["signed_in"], 0);
        assert_eq!(json["total_chips"], 0);
    }
}
