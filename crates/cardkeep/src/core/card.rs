//! Record schema for collection entries
//!
//! A [`Card`] is one entry of a user's collection. Its [`Color`] is a closed
//! set; free-text fields such as the card type decide which optional fields
//! are meaningful.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CardError;

/// Card type that makes strength and toughness meaningful
pub const CREATURE: &str = "Creature";

/// Card type that makes loyalty meaningful
pub const PLANESWALKER: &str = "Planeswalker";

/// Color identity of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Multicolor,
}

impl Color {
    /// Every color, in display order
    pub const ALL: [Color; 7] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
        Color::Multicolor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Colorless => "Colorless",
            Color::Multicolor => "Multicolor",
        }
    }

    /// Returns true for the color rendered one glyph at a time
    pub fn is_multicolor(&self) -> bool {
        matches!(self, Color::Multicolor)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CardError::UnknownColor {
                color: s.to_string(),
            })
    }
}

/// A single collection entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    pub name: String,
    pub mana_cost: u32,
    pub color: Color,
    #[serde(rename = "type")]
    pub card_type: String,
    pub rarity: String,
    #[serde(default)]
    pub rules_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<f64>,
}

impl Card {
    /// Create a card with the mandatory fields and no optional ones
    pub fn new(
        id: u32,
        name: impl Into<String>,
        mana_cost: u32,
        color: Color,
        card_type: impl Into<String>,
        rarity: impl Into<String>,
        rules_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mana_cost,
            color,
            card_type: card_type.into(),
            rarity: rarity.into(),
            rules_text: rules_text.into(),
            strength: None,
            toughness: None,
            loyalty: None,
            market_value: None,
        }
    }

    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn with_toughness(mut self, toughness: i32) -> Self {
        self.toughness = Some(toughness);
        self
    }

    pub fn with_loyalty(mut self, loyalty: u32) -> Self {
        self.loyalty = Some(loyalty);
        self
    }

    pub fn with_market_value(mut self, market_value: f64) -> Self {
        self.market_value = Some(market_value);
        self
    }

    pub fn is_creature(&self) -> bool {
        self.card_type == CREATURE
    }

    pub fn is_planeswalker(&self) -> bool {
        self.card_type == PLANESWALKER
    }

    /// Check the invariants that serde cannot express
    pub fn validate(&self) -> Result<(), CardError> {
        if self.name.trim().is_empty() {
            return Err(CardError::EmptyName);
        }
        if let Some(value) = self.market_value {
            if !value.is_finite() || value < 0.0 {
                return Err(CardError::InvalidMarketValue { value });
            }
        }
        Ok(())
    }
}

/// How an update decides whether a supplied field replaces the stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MergePolicy {
    /// Any supplied value replaces the stored one, including zero and ""
    #[default]
    Explicit,
    /// Zero, 0.0 and "" count as not supplied and keep the stored value
    Truthy,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::Explicit => write!(f, "explicit"),
            MergePolicy::Truthy => write!(f, "truthy"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explicit" => Ok(MergePolicy::Explicit),
            "truthy" => Ok(MergePolicy::Truthy),
            _ => Err(format!("Unknown merge policy: {}", s)),
        }
    }
}

/// Partial card used by updates; `None` means the field was not supplied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub name: Option<String>,
    pub mana_cost: Option<u32>,
    pub color: Option<Color>,
    pub card_type: Option<String>,
    pub rarity: Option<String>,
    pub rules_text: Option<String>,
    pub strength: Option<i32>,
    pub toughness: Option<i32>,
    pub loyalty: Option<u32>,
    pub market_value: Option<f64>,
}

impl CardPatch {
    /// Produce the card that results from applying this patch to `card`
    pub fn apply(&self, card: &Card, policy: MergePolicy) -> Card {
        Card {
            id: card.id,
            name: pick(&self.name, &card.name, policy),
            mana_cost: pick(&self.mana_cost, &card.mana_cost, policy),
            color: self.color.unwrap_or(card.color),
            card_type: pick(&self.card_type, &card.card_type, policy),
            rarity: pick(&self.rarity, &card.rarity, policy),
            rules_text: pick(&self.rules_text, &card.rules_text, policy),
            strength: pick_optional(self.strength, card.strength, policy),
            toughness: pick_optional(self.toughness, card.toughness, policy),
            loyalty: pick_optional(self.loyalty, card.loyalty, policy),
            market_value: pick_optional(self.market_value, card.market_value, policy),
        }
    }
}

/// Values with a "falsy" representation under the legacy merge rule
trait Falsy {
    fn is_falsy(&self) -> bool;
}

impl Falsy for String {
    fn is_falsy(&self) -> bool {
        self.is_empty()
    }
}

impl Falsy for u32 {
    fn is_falsy(&self) -> bool {
        *self == 0
    }
}

impl Falsy for i32 {
    fn is_falsy(&self) -> bool {
        *self == 0
    }
}

impl Falsy for f64 {
    fn is_falsy(&self) -> bool {
        *self == 0.0 || self.is_nan()
    }
}

fn accepts<T: Falsy>(value: &T, policy: MergePolicy) -> bool {
    match policy {
        MergePolicy::Explicit => true,
        MergePolicy::Truthy => !value.is_falsy(),
    }
}

fn pick<T: Falsy + Clone>(new: &Option<T>, old: &T, policy: MergePolicy) -> T {
    match new {
        Some(value) if accepts(value, policy) => value.clone(),
        _ => old.clone(),
    }
}

fn pick_optional<T: Falsy + Copy>(
    new: Option<T>,
    old: Option<T>,
    policy: MergePolicy,
) -> Option<T> {
    match new {
        Some(value) if accepts(&value, policy) => Some(value),
        _ => old,
    }
}

/// Name under which a collection is stored
///
/// Restricted to characters that are safe as a single file name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, CardError> {
        let valid = !raw.is_empty()
            && !raw.starts_with('.')
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(CardError::InvalidUsername {
                username: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Username::parse(s)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serra_angel() -> Card {
        Card::new(1, "Serra Angel", 5, Color::White, CREATURE, "Uncommon", "Flying, vigilance")
            .with_strength(4)
            .with_toughness(4)
    }

    #[test]
    fn test_color_parsing_is_case_insensitive() {
        assert_eq!(Color::from_str("white").unwrap(), Color::White);
        assert_eq!(Color::from_str("MULTICOLOR").unwrap(), Color::Multicolor);
        assert_eq!(Color::from_str(" Colorless ").unwrap(), Color::Colorless);
        assert!(matches!(
            Color::from_str("purple"),
            Err(CardError::UnknownColor { .. })
        ));
    }

    #[test]
    fn test_color_display_round_trips() {
        for color in Color::ALL {
            assert_eq!(Color::from_str(&color.to_string()).unwrap(), color);
        }
    }

    #[test]
    fn test_card_json_field_names() {
        let card = serra_angel().with_market_value(1.5);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["manaCost"], 5);
        assert_eq!(json["type"], "Creature");
        assert_eq!(json["rulesText"], "Flying, vigilance");
        assert_eq!(json["color"], "White");
        assert_eq!(json["marketValue"], 1.5);
        assert!(json.get("loyalty").is_none());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let card = Card::new(3, "   ", 1, Color::Blue, "Instant", "Common", "");
        assert_eq!(card.validate(), Err(CardError::EmptyName));
    }

    #[test]
    fn test_validate_rejects_negative_market_value() {
        let card = serra_angel().with_market_value(-2.0);
        assert!(matches!(
            card.validate(),
            Err(CardError::InvalidMarketValue { .. })
        ));
        assert!(serra_angel().with_market_value(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_type_predicates() {
        assert!(serra_angel().is_creature());
        assert!(!serra_angel().is_planeswalker());
        let jace = Card::new(9, "Jace", 4, Color::Blue, PLANESWALKER, "Mythic", "");
        assert!(jace.is_planeswalker());
    }

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let patch = CardPatch {
            mana_cost: Some(6),
            ..CardPatch::default()
        };
        let updated = patch.apply(&serra_angel(), MergePolicy::Explicit);
        assert_eq!(updated.mana_cost, 6);
        assert_eq!(updated.name, "Serra Angel");
        assert_eq!(updated.color, Color::White);
        assert_eq!(updated.strength, Some(4));
    }

    #[test]
    fn test_explicit_policy_accepts_zero_and_empty() {
        let patch = CardPatch {
            mana_cost: Some(0),
            rules_text: Some(String::new()),
            strength: Some(0),
            ..CardPatch::default()
        };
        let updated = patch.apply(&serra_angel(), MergePolicy::Explicit);
        assert_eq!(updated.mana_cost, 0);
        assert_eq!(updated.rules_text, "");
        assert_eq!(updated.strength, Some(0));
    }

    #[test]
    fn test_truthy_policy_ignores_zero_and_empty() {
        let patch = CardPatch {
            name: Some(String::new()),
            mana_cost: Some(0),
            strength: Some(0),
            market_value: Some(0.0),
            toughness: Some(5),
            ..CardPatch::default()
        };
        let original = serra_angel().with_market_value(3.0);
        let updated = patch.apply(&original, MergePolicy::Truthy);
        assert_eq!(updated.name, "Serra Angel");
        assert_eq!(updated.mana_cost, 5);
        assert_eq!(updated.strength, Some(4));
        assert_eq!(updated.market_value, Some(3.0));
        assert_eq!(updated.toughness, Some(5));
    }

    #[test]
    fn test_color_only_patch() {
        let unchanged = CardPatch::default().apply(&serra_angel(), MergePolicy::Explicit);
        assert_eq!(unchanged, serra_angel());
        let patch = CardPatch {
            color: Some(Color::Red),
            ..CardPatch::default()
        };
        assert_eq!(patch.apply(&serra_angel(), MergePolicy::Truthy).color, Color::Red);
    }

    #[test]
    fn test_merge_policy_parsing() {
        assert_eq!(MergePolicy::from_str("Explicit").unwrap(), MergePolicy::Explicit);
        assert_eq!(MergePolicy::from_str("truthy").unwrap(), MergePolicy::Truthy);
        assert!(MergePolicy::from_str("lenient").is_err());
        assert_eq!(MergePolicy::default(), MergePolicy::Explicit);
    }

    #[test]
    fn test_username_validation() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("bob_2.backup").is_ok());
        assert!(Username::parse("").is_err());
        assert!(Username::parse("../etc").is_err());
        assert!(Username::parse(".hidden").is_err());
        assert!(Username::parse("a/b").is_err());
        assert_eq!(Username::parse("carol").unwrap().to_string(), "carol");
    }
}
