//! Player-side sign-in composer
//!
//! Holds the three inputs of the sign-in form and derives bonus chips from
//! them on demand. Inputs are clamped, never rejected.

use crate::payload::{self, PayloadError, SignInPayload};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Direction of a +/- step on the food & drink amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Up,
    Down,
}

/// Outcome of asking for VIP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VipRequest {
    /// VIP can't be switched on from the form; membership has to be confirmed first
    ConfirmationRequired { membership_url: String },
    /// VIP was already confirmed for this draft
    AlreadyEnabled,
}

/// Sign-in form for one game
#[derive(Debug, Clone)]
pub struct Composer {
    game_id: GameId,
    venue_name: String,
    player_name: Option<String>,
    membership_url: String,
    food_drink_amount: u32,
    is_vip: bool,
    is_dealer: bool,
    payload: Option<SignInPayload>,
}

impl Composer {
    pub fn new(
        game_id: GameId,
        venue_name: String,
        player_name: Option<String>,
        membership_url: String,
    ) -> Self {
        Self {
            game_id,
            venue_name,
            player_name,
            membership_url,
            food_drink_amount: 0,
            is_vip: false,
            is_dealer: false,
            payload: None,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn venue_name(&self) -> &str {
        &self.venue_name
    }

    pub fn food_drink_amount(&self) -> u32 {
        self.food_drink_amount
    }

    pub fn is_vip(&self) -> bool {
        self.is_vip
    }

    pub fn is_dealer(&self) -> bool {
        self.is_dealer
    }

    /// Most recently generated payload, until the composer is closed
    pub fn payload(&self) -> Option<&SignInPayload> {
        self.payload.as_ref()
    }

    /// Current chip breakdown
    pub fn chips(&self) -> ChipBreakdown {
        ChipBreakdown::compute(
            self.food_drink_amount as i64,
            self.is_vip,
            self.is_dealer,
        )
    }

    pub fn set_food_drink_amount(&mut self, amount: i64) {
        self.food_drink_amount = clamp_food_drink_amount(amount);
    }

    /// Set the amount from the free-text field (leading integer, else 0)
    pub fn set_food_drink_input(&mut self, input: &str) {
        self.set_food_drink_amount(parse_leading_int(input));
    }

    pub fn step_food_drink(&mut self, step: Step) {
        let current = self.food_drink_amount as i64;
        let delta = FOOD_DRINK_STEP as i64;
        match step {
            Step::Up => self.set_food_drink_amount(current + delta),
            Step::Down => self.set_food_drink_amount(current - delta),
        }
    }

    pub fn max_food_drink(&mut self) {
        self.food_drink_amount = MAX_FOOD_DRINK_AMOUNT;
    }

    /// Ask to switch VIP on. Never enables it directly.
    pub fn request_vip(&self) -> VipRequest {
        if self.is_vip {
            VipRequest::AlreadyEnabled
        } else {
            VipRequest::ConfirmationRequired {
                membership_url: self.membership_url.clone(),
            }
        }
    }

    /// Enable VIP after the membership was confirmed externally
    pub fn confirm_vip(&mut self) {
        self.is_vip = true;
    }

    pub fn disable_vip(&mut self) {
        self.is_vip = false;
    }

    pub fn set_dealer(&mut self, enabled: bool) {
        self.is_dealer = enabled;
    }

    /// Build the sign-in record from the current inputs and encode it.
    ///
    /// The draft inputs are reset once the payload exists; the payload stays
    /// available through [`Composer::payload`] until [`Composer::close`].
    pub fn submit(&mut self) -> Result<SignInPayload, PayloadError> {
        let record = SignInRecord::new(
            self.game_id.clone(),
            self.venue_name.clone(),
            self.player_name.clone(),
            self.chips(),
            self.is_vip,
            self.is_dealer,
            now_iso(),
        );
        let payload = payload::encode(record)?;

        tracing::info!(
            "Sign-in generated for game {} ({}) with {} bonus chips",
            self.game_id,
            self.venue_name,
            payload.record.total_chips
        );

        self.reset_inputs();
        self.payload = Some(payload.clone());
        Ok(payload)
    }

    /// Reset all inputs and discard any generated payload
    pub fn close(&mut self) {
        self.reset_inputs();
        self.payload = None;
    }

    fn reset_inputs(&mut self) {
        self.food_drink_amount = 0;
        self.is_vip = false;
        self.is_dealer = false;
    }
}

/// Parse a leading (optionally signed) integer, ignoring trailing garbage.
/// Anything without leading digits is 0.
fn parse_leading_int(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }

    // Saturate absurdly long inputs; they get clamped anyway
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(sign * i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> Composer {
        Composer::new(
            "7".to_string(),
            "Marlow's Tavern".to_string(),
            Some("Lane".to_string()),
            "https://example.com/vip".to_string(),
        )
    }

    #[test]
    fn test_amount_is_clamped() {
        let mut c = composer();
        c.set_food_drink_amount(45);
        assert_eq!(c.food_drink_amount(), 30);
        assert_eq!(c.chips().food_drink_chips, 3000);

        c.set_food_drink_amount(-3);
        assert_eq!(c.food_drink_amount(), 0);
        assert_eq!(c.chips().total_chips, 0);
    }

    #[test]
    fn test_steps_and_max() {
        let mut c = composer();
        c.step_food_drink(Step::Down);
        assert_eq!(c.food_drink_amount(), 0);

        c.step_food_drink(Step::Up);
        c.step_food_drink(Step::Up);
        assert_eq!(c.food_drink_amount(), 10);

        c.set_food_drink_amount(28);
        c.step_food_drink(Step::Up);
        assert_eq!(c.food_drink_amount(), 30);

        c.set_food_drink_amount(0);
        c.max_food_drink();
        assert_eq!(c.food_drink_amount(), 30);
    }

    #[test]
    fn test_text_input() {
        let mut c = composer();
        c.set_food_drink_input("12");
        assert_eq!(c.food_drink_amount(), 12);
        c.set_food_drink_input("17abc");
        assert_eq!(c.food_drink_amount(), 17);
        c.set_food_drink_input("abc");
        assert_eq!(c.food_drink_amount(), 0);
        c.set_food_drink_input("999999999999999999999999");
        assert_eq!(c.food_drink_amount(), 30);
        c.set_food_drink_input("-8");
        assert_eq!(c.food_drink_amount(), 0);
    }

    #[test]
    fn test_vip_requires_confirmation() {
        let mut c = composer();
        assert_eq!(
            c.request_vip(),
            VipRequest::ConfirmationRequired {
                membership_url: "https://example.com/vip".to_string()
            }
        );
        assert!(!c.is_vip());
        assert_eq!(c.chips().vip_chips, 0);

        c.confirm_vip();
        assert!(c.is_vip());
        assert_eq!(c.request_vip(), VipRequest::AlreadyEnabled);
        assert_eq!(c.chips().vip_chips, 1500);

        c.disable_vip();
        assert!(!c.is_vip());
    }

    #[test]
    fn test_dealer_toggle_is_free() {
        let mut c = composer();
        c.set_dealer(true);
        assert_eq!(c.chips().dealer_chips, 1500);
        c.set_dealer(false);
        assert_eq!(c.chips().dealer_chips, 0);
    }

    #[test]
    fn test_submit_builds_record_and_resets_draft() {
        let mut c = composer();
        c.set_food_drink_amount(25);
        c.set_dealer(true);

        let payload = c.submit().unwrap();
        assert_eq!(payload.record.game_id, "7");
        assert_eq!(payload.record.venue_name, "Marlow's Tavern");
        assert_eq!(payload.record.player_name.as_deref(), Some("Lane"));
        assert_eq!(payload.record.food_drink_chips, 2500);
        assert_eq!(payload.record.dealer_chips, 1500);
        assert_eq!(payload.record.total_chips, 4000);
        assert!(!payload.record.timestamp.is_empty());

        assert_eq!(c.food_drink_amount(), 0);
        assert!(!c.is_dealer());
        assert!(c.payload().is_some());
    }

    #[test]
    fn test_close_discards_everything() {
        let mut c = composer();
        c.set_food_drink_amount(20);
        c.confirm_vip();
        c.submit().unwrap();

        c.set_dealer(true);
        c.close();
        assert!(c.payload().is_none());
        assert_eq!(c.food_drink_amount(), 0);
        assert!(!c.is_vip());
        assert!(!c.is_dealer());
    }
}
