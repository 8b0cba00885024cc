use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type GameId = String;
pub type PlayerId = String;

/// Upper bound of the food & drink commitment, in whole currency units
pub const MAX_FOOD_DRINK_AMOUNT: u32 = 30;
/// Step used by the +/- buttons of the composer
pub const FOOD_DRINK_STEP: u32 = 5;
/// Every unit spent on food & drink earns this many bonus chips
pub const CHIPS_PER_FOOD_DRINK_UNIT: u32 = 100;
pub const VIP_BONUS_CHIPS: u32 = 1500;
pub const DEALER_BONUS_CHIPS: u32 = 1500;

/// Name shown for a scanned sign-in that carries no player name
pub const GUEST_PLAYER_NAME: &str = "Guest Player";

/// Bonus chips derived from the three composer inputs.
///
/// Always computed from the inputs, never stored alongside them, so a total
/// can't go stale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChipBreakdown {
    pub food_drink_amount: u32,
    pub food_drink_chips: u32,
    pub vip_chips: u32,
    pub dealer_chips: u32,
    pub total_chips: u32,
}

impl ChipBreakdown {
    /// Compute the breakdown; `food_drink_amount` is clamped to `0..=30` first.
    pub fn compute(food_drink_amount: i64, is_vip: bool, is_dealer: bool) -> Self {
        let food_drink_amount = clamp_food_drink_amount(food_drink_amount);
        let food_drink_chips = food_drink_amount * CHIPS_PER_FOOD_DRINK_UNIT;
        let vip_chips = if is_vip { VIP_BONUS_CHIPS } else { 0 };
        let dealer_chips = if is_dealer { DEALER_BONUS_CHIPS } else { 0 };

        Self {
            food_drink_amount,
            food_drink_chips,
            vip_chips,
            dealer_chips,
            total_chips: food_drink_chips + vip_chips + dealer_chips,
        }
    }
}

/// Clamp a requested food & drink amount to the nearest allowed bound
pub fn clamp_food_drink_amount(amount: i64) -> u32 {
    amount.clamp(0, MAX_FOOD_DRINK_AMOUNT as i64) as u32
}

/// The sign-in record carried by the QR payload.
///
/// Serializes to the canonical wire shape (camelCase keys, `isVIP`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInRecord {
    pub game_id: GameId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub venue_name: String,
    pub food_drink_amount: u32,
    pub food_drink_chips: u32,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    pub vip_chips: u32,
    pub is_dealer: bool,
    pub dealer_chips: u32,
    pub total_chips: u32,
    /// ISO-8601 creation time
    pub timestamp: String,
}

impl SignInRecord {
    /// Build a record whose chip fields are derived from `chips`
    pub fn new(
        game_id: GameId,
        venue_name: String,
        player_name: Option<String>,
        chips: ChipBreakdown,
        is_vip: bool,
        is_dealer: bool,
        timestamp: String,
    ) -> Self {
        Self {
            game_id,
            player_name,
            venue_name,
            food_drink_amount: chips.food_drink_amount,
            food_drink_chips: chips.food_drink_chips,
            is_vip,
            vip_chips: chips.vip_chips,
            is_dealer,
            dealer_chips: chips.dealer_chips,
            total_chips: chips.total_chips,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SignInStatus {
    Pending,
    Approved,
    Rejected,
}

/// A scanned sign-in as the TD sees it: the payload fields plus identity
/// and review status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingPlayer {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub game_id: GameId,
    pub venue_name: String,
    pub food_drink_amount: u32,
    pub food_drink_chips: u32,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    pub vip_chips: u32,
    pub is_dealer: bool,
    pub dealer_chips: u32,
    pub total_chips: u32,
    pub timestamp: String,
    pub status: SignInStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    #[serde(rename = "td")]
    Director,
}

/// Connection counts by role
#[derive(Debug, Clone, Default)]
pub struct ConnectionCounts {
    pub players: u32,
    pub directors: u32,
}

/// Current time as an ISO-8601 UTC string with millisecond precision
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_formula_holds_for_all_inputs() {
        for amount in -10..=40 {
            for is_vip in [false, true] {
                for is_dealer in [false, true] {
                    let chips = ChipBreakdown::compute(amount, is_vip, is_dealer);
                    let clamped = amount.clamp(0, 30) as u32;
                    assert_eq!(chips.food_drink_amount, clamped);
                    assert_eq!(
                        chips.total_chips,
                        clamped * 100
                            + if is_vip { 1500 } else { 0 }
                            + if is_dealer { 1500 } else { 0 }
                    );
                }
            }
        }
    }

    #[test]
    fn test_sample_breakdown() {
        let chips = ChipBreakdown::compute(25, false, true);
        assert_eq!(chips.food_drink_chips, 2500);
        assert_eq!(chips.vip_chips, 0);
        assert_eq!(chips.dealer_chips, 1500);
        assert_eq!(chips.total_chips, 4000);
    }

    #[test]
    fn test_record_wire_keys() {
        let record = SignInRecord::new(
            "7".to_string(),
            "Marlow's Tavern".to_string(),
            None,
            ChipBreakdown::compute(10, true, false),
            true,
            false,
            "2024-12-19T19:00:00.000Z".to_string(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gameId"], "7");
        assert_eq!(json["isVIP"], true);
        assert_eq!(json["vipChips"], 1500);
        assert_eq!(json["totalChips"], 2500);
        assert!(json.get("playerName").is_none());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Director).unwrap(), "\"td\"");
        assert_eq!(serde_json::to_string(&Role::Player).unwrap(), "\"player\"");
    }
}
