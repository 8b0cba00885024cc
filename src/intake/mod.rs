//! Director-side sign-in intake
//!
//! Both channels (camera scan and pasted text) end in [`parse_payload`].
//! At most one parsed sign-in waits for review at a time; a newer one
//! replaces it.

pub mod scanner;

use crate::camera::CameraError;
use crate::types::*;
use rand::Rng;
use serde_json::{Map, Value};

pub use scanner::{ScanStart, Scanner};

/// Avatar placeholders are picked from this many images
const AVATAR_POOL_SIZE: u32 = 70;

/// Errors shown inline in the intake. All are recoverable by the operator.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Invalid QR code data: {0}")]
    MalformedPayload(String),

    #[error("Invalid QR data: missing required field '{0}'")]
    MissingRequiredField(&'static str),

    #[error("{0}")]
    CameraUnavailable(String),
}

impl IntakeError {
    /// Stable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            IntakeError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            IntakeError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            IntakeError::CameraUnavailable(_) => "CAMERA_UNAVAILABLE",
        }
    }
}

impl From<CameraError> for IntakeError {
    fn from(e: CameraError) -> Self {
        IntakeError::CameraUnavailable(e.to_string())
    }
}

/// Parse payload text into a pending player.
///
/// `gameId` must be present and truthy, `totalChips` must be present (0 and
/// null count as present). Every other field falls back to its zero value
/// when missing or falsy.
pub fn parse_payload(text: &str) -> Result<PendingPlayer, IntakeError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| IntakeError::MalformedPayload(e.to_string()))?;
    let data = value
        .as_object()
        .ok_or_else(|| IntakeError::MalformedPayload("expected a JSON object".to_string()))?;

    let game_id = non_empty_string(data.get("gameId"))
        .ok_or(IntakeError::MissingRequiredField("gameId"))?;
    let total_chips = data
        .get("totalChips")
        .map(as_count)
        .ok_or(IntakeError::MissingRequiredField("totalChips"))?;

    Ok(PendingPlayer {
        id: format!("scanned-{}", ulid::Ulid::new()),
        name: non_empty_string(data.get("playerName"))
            .unwrap_or_else(|| GUEST_PLAYER_NAME.to_string()),
        avatar: non_empty_string(data.get("avatar")).unwrap_or_else(placeholder_avatar),
        game_id,
        venue_name: non_empty_string(data.get("venueName")).unwrap_or_default(),
        food_drink_amount: count_field(data, "foodDrinkAmount"),
        food_drink_chips: count_field(data, "foodDrinkChips"),
        is_vip: flag_field(data, "isVIP"),
        vip_chips: count_field(data, "vipChips"),
        is_dealer: flag_field(data, "isDealer"),
        dealer_chips: count_field(data, "dealerChips"),
        total_chips,
        timestamp: non_empty_string(data.get("timestamp")).unwrap_or_else(now_iso),
        status: SignInStatus::Pending,
    })
}

/// A random placeholder avatar reference
pub fn placeholder_avatar() -> String {
    let img = rand::rng().random_range(0..AVATAR_POOL_SIZE);
    format!("https://i.pravatar.cc/150?img={}", img)
}

/// Sample payload used by the simulated scan (demo mode)
pub fn sample_payload() -> String {
    let record = SignInRecord::new(
        "7".to_string(),
        "Marlow's Tavern".to_string(),
        Some("James W.".to_string()),
        ChipBreakdown::compute(25, false, true),
        false,
        true,
        now_iso(),
    );
    // A plain struct of strings and integers always serializes
    serde_json::to_string(&record).unwrap_or_default()
}

/// Strings pass through when non-empty; numbers are stringified
fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn count_field(data: &Map<String, Value>, key: &str) -> u32 {
    data.get(key).map(as_count).unwrap_or(0)
}

/// Non-negative whole numbers that fit in u32; anything else counts as 0
fn as_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(0)
            } else {
                match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => f as u32,
                    _ => 0,
                }
            }
        }
        _ => 0,
    }
}

fn flag_field(data: &Map<String, Value>, key: &str) -> bool {
    data.get(key).map(is_truthy).unwrap_or(false)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Manual-paste state plus the single awaiting-review slot
#[derive(Debug, Clone, Default)]
pub struct Intake {
    manual_input: String,
    error: Option<IntakeError>,
    awaiting_review: Option<PendingPlayer>,
}

impl Intake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manual_input(&self) -> &str {
        &self.manual_input
    }

    pub fn set_manual_input(&mut self, text: String) {
        self.manual_input = text;
    }

    /// Last inline error, if the most recent attempt failed
    pub fn error(&self) -> Option<&IntakeError> {
        self.error.as_ref()
    }

    pub fn awaiting_review(&self) -> Option<&PendingPlayer> {
        self.awaiting_review.as_ref()
    }

    /// Parse the pasted text. On failure the text is kept for correction.
    pub fn submit_manual(&mut self) -> Result<&PendingPlayer, IntakeError> {
        let player = self.checked(parse_payload(&self.manual_input))?;
        self.manual_input.clear();
        Ok(self.hold(player))
    }

    /// Parse text from either channel into the awaiting-review slot (last one wins)
    pub fn accept(&mut self, text: &str) -> Result<&PendingPlayer, IntakeError> {
        let player = self.checked(parse_payload(text))?;
        Ok(self.hold(player))
    }

    /// Record a camera failure; the manual path is unaffected
    pub fn camera_failed(&mut self, error: IntakeError) {
        self.error = Some(error);
    }

    /// Take the awaiting-review entry out of the slot
    pub fn take_pending(&mut self) -> Option<PendingPlayer> {
        self.awaiting_review.take()
    }

    fn checked(
        &mut self,
        result: Result<PendingPlayer, IntakeError>,
    ) -> Result<PendingPlayer, IntakeError> {
        if let Err(e) = &result {
            tracing::warn!("Rejected sign-in payload: {}", e);
            self.error = Some(e.clone());
        }
        result
    }

    fn hold(&mut self, player: PendingPlayer) -> &PendingPlayer {
        if let Some(previous) = &self.awaiting_review {
            tracing::info!(
                "Replacing pending sign-in {} with {}",
                previous.id,
                player.id
            );
        }
        self.error = None;
        self.awaiting_review.insert(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::config::DEFAULT_VIP_MEMBERSHIP_URL;

    #[test]
    fn test_empty_object_is_missing_field() {
        assert_eq!(
            parse_payload("{}").unwrap_err(),
            IntakeError::MissingRequiredField("gameId")
        );
    }

    #[test]
    fn test_missing_total_chips() {
        let err = parse_payload(r#"{"gameId":"7"}"#).unwrap_err();
        assert_eq!(err, IntakeError::MissingRequiredField("totalChips"));
        assert_eq!(err.code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_empty_game_id_is_missing() {
        assert_eq!(
            parse_payload(r#"{"gameId":"","totalChips":100}"#).unwrap_err(),
            IntakeError::MissingRequiredField("gameId")
        );
    }

    #[test]
    fn test_malformed_text() {
        let err = parse_payload("not json at all").unwrap_err();
        assert!(matches!(err, IntakeError::MalformedPayload(_)));
        assert_eq!(err.code(), "MALFORMED_PAYLOAD");

        assert!(matches!(
            parse_payload("[1,2,3]").unwrap_err(),
            IntakeError::MalformedPayload(_)
        ));
    }

    #[test]
    fn test_zero_total_chips_is_valid() {
        let player = parse_payload(r#"{"gameId":"7","totalChips":0}"#).unwrap();
        assert_eq!(player.total_chips, 0);
        assert_eq!(player.name, "Guest Player");
        assert_eq!(player.status, SignInStatus::Pending);
        assert_eq!(player.game_id, "7");
        assert_eq!(player.venue_name, "");
        assert!(!player.is_vip);
        assert!(!player.is_dealer);
        assert_eq!(player.food_drink_amount, 0);
        assert!(player.id.starts_with("scanned-"));
        assert!(player.avatar.starts_with("https://i.pravatar.cc/150?img="));
        assert!(!player.timestamp.is_empty());
    }

    #[test]
    fn test_null_total_chips_counts_as_present() {
        let player = parse_payload(r#"{"gameId":"7","totalChips":null}"#).unwrap();
        assert_eq!(player.total_chips, 0);
    }

    #[test]
    fn test_falsy_optional_fields_default() {
        let player = parse_payload(
            r#"{"gameId":7,"totalChips":1500,"playerName":"","isVIP":0,"isDealer":1,"foodDrinkAmount":"5","timestamp":""}"#,
        )
        .unwrap();
        assert_eq!(player.game_id, "7");
        assert_eq!(player.name, "Guest Player");
        assert!(!player.is_vip);
        assert!(player.is_dealer);
        assert_eq!(player.food_drink_amount, 0);
        assert!(!player.timestamp.is_empty());
    }

    #[test]
    fn test_ids_are_unique_per_scan() {
        let text = r#"{"gameId":"7","totalChips":100}"#;
        let a = parse_payload(text).unwrap();
        let b = parse_payload(text).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_sample_payload_parses() {
        let player = parse_payload(&sample_payload()).unwrap();
        assert_eq!(player.name, "James W.");
        assert_eq!(player.venue_name, "Marlow's Tavern");
        assert_eq!(player.food_drink_amount, 25);
        assert_eq!(player.food_drink_chips, 2500);
        assert!(player.is_dealer);
        assert_eq!(player.dealer_chips, 1500);
        assert_eq!(player.total_chips, 4000);
    }

    #[test]
    fn test_manual_input_kept_on_error() {
        let mut intake = Intake::new();
        intake.set_manual_input(r#"{"totalChips":5}"#.to_string());
        assert!(intake.submit_manual().is_err());
        assert_eq!(intake.manual_input(), r#"{"totalChips":5}"#);
        assert_eq!(
            intake.error(),
            Some(&IntakeError::MissingRequiredField("gameId"))
        );
        assert!(intake.awaiting_review().is_none());

        intake.set_manual_input(r#"{"gameId":"3","totalChips":5}"#.to_string());
        let id = intake.submit_manual().unwrap().id.clone();
        assert_eq!(intake.manual_input(), "");
        assert!(intake.error().is_none());
        assert_eq!(intake.awaiting_review().unwrap().id, id);
    }

    #[test]
    fn test_last_parsed_wins() {
        let mut intake = Intake::new();
        intake.accept(r#"{"gameId":"7","totalChips":100}"#).unwrap();
        let second = intake
            .accept(r#"{"gameId":"7","totalChips":200}"#)
            .unwrap()
            .id
            .clone();

        let pending = intake.take_pending().unwrap();
        assert_eq!(pending.id, second);
        assert_eq!(pending.total_chips, 200);
        assert!(intake.take_pending().is_none());
    }

    #[test]
    fn test_failed_parse_keeps_existing_pending() {
        let mut intake = Intake::new();
        intake.accept(r#"{"gameId":"7","totalChips":100}"#).unwrap();
        assert!(intake.accept("{").is_err());
        assert_eq!(intake.awaiting_review().unwrap().total_chips, 100);
    }

    #[test]
    fn test_resubmitting_replaces_pending() {
        let mut intake = Intake::new();
        intake.set_manual_input(r#"{"gameId":"7","totalChips":100}"#.to_string());
        let first = intake.submit_manual().unwrap().id.clone();

        intake.set_manual_input(r#"{"gameId":"7","totalChips":300}"#.to_string());
        let held = intake.submit_manual().unwrap();
        assert_ne!(held.id, first);
        assert_eq!(held.total_chips, 300);
        assert_eq!(intake.awaiting_review().unwrap().total_chips, 300);
    }

    #[test]
    fn test_composed_record_round_trips() {
        for amount in [0, 5, 25, 30] {
            for vip in [false, true] {
                for dealer in [false, true] {
                    let mut composer = Composer::new(
                        "7".to_string(),
                        "Marlow's Tavern".to_string(),
                        Some("Lane".to_string()),
                        DEFAULT_VIP_MEMBERSHIP_URL.to_string(),
                    );
                    composer.set_food_drink_amount(amount);
                    if vip {
                        composer.confirm_vip();
                    }
                    composer.set_dealer(dealer);

                    let payload = composer.submit().unwrap();
                    let record = &payload.record;
                    let player = parse_payload(&payload.text).unwrap();

                    let case = format!("amount={} vip={} dealer={}", amount, vip, dealer);
                    assert_eq!(player.game_id, record.game_id, "{}", case);
                    assert_eq!(player.venue_name, record.venue_name, "{}", case);
                    assert_eq!(player.name, "Lane", "{}", case);
                    assert_eq!(player.food_drink_amount, record.food_drink_amount, "{}", case);
                    assert_eq!(player.food_drink_chips, record.food_drink_chips, "{}", case);
                    assert_eq!(player.is_vip, record.is_vip, "{}", case);
                    assert_eq!(player.vip_chips, record.vip_chips, "{}", case);
                    assert_eq!(player.is_dealer, record.is_dealer, "{}", case);
                    assert_eq!(player.dealer_chips, record.dealer_chips, "{}", case);
                    assert_eq!(player.total_chips, record.total_chips, "{}", case);
                    assert_eq!(player.timestamp, record.timestamp, "{}", case);
                    assert_eq!(record.is_vip, vip, "{}", case);
                    assert_eq!(record.is_dealer, dealer, "{}", case);
                }
            }
        }
    }
}
