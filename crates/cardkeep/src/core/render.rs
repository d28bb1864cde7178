//! Terminal presentation of cards
//!
//! Renders cards as labeled lines, colorized with ANSI escape codes via
//! crossterm. Multicolor cards get a random style per letter, drawn from the
//! caller's RNG so the output can be made reproducible.

use crossterm::style::{Color as TermColor, Stylize};
use rand::Rng;

use super::card::{Card, Color};

/// Separator printed before every card block
pub const SEPARATOR: &str = "--------------------------------";

/// Styles a Multicolor name draws from, one per letter
pub const MULTICOLOR_PALETTE: [TermColor; 6] = [
    TermColor::White,
    TermColor::Blue,
    TermColor::Black,
    TermColor::Red,
    TermColor::Green,
    TermColor::DarkGrey,
];

const LABEL_STYLE: TermColor = TermColor::Green;
const FAILURE_STYLE: TermColor = TermColor::Red;

/// Fixed terminal style of a single-style color
fn term_color(color: Color) -> Option<TermColor> {
    match color {
        Color::White => Some(TermColor::White),
        Color::Blue => Some(TermColor::Blue),
        Color::Black => Some(TermColor::Black),
        Color::Red => Some(TermColor::Red),
        Color::Green => Some(TermColor::Green),
        Color::Colorless => Some(TermColor::DarkGrey),
        Color::Multicolor => None,
    }
}

/// Renders cards and status lines, with or without ANSI colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRenderer {
    colorize: bool,
}

impl CardRenderer {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    /// Renderer that emits no escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Render one card as labeled lines, without a trailing newline
    ///
    /// Strength and toughness appear only for creatures, loyalty only for
    /// planeswalkers, market value only when known.
    pub fn render_card<R: Rng + ?Sized>(&self, card: &Card, rng: &mut R) -> String {
        let mut lines = vec![
            self.line("ID", &card.id.to_string()),
            self.line("Name", &card.name),
            self.line("Mana Cost", &card.mana_cost.to_string()),
            format!("{}{}", self.paint("Color: ", LABEL_STYLE), self.render_color(card.color, rng)),
            self.line("Type", &card.card_type),
            self.line("Rarity", &card.rarity),
            self.line("Rules Text", &card.rules_text),
        ];

        if card.is_creature() {
            lines.push(self.line("Strength", &display_optional(card.strength)));
            lines.push(self.line("Toughness", &display_optional(card.toughness)));
        } else if card.is_planeswalker() {
            lines.push(self.line("Loyalty", &display_optional(card.loyalty)));
        }

        if let Some(value) = card.market_value {
            lines.push(self.line("Market Value", &value.to_string()));
        }

        lines.join("\n")
    }

    /// Output of the read command
    pub fn render_read<R: Rng + ?Sized>(&self, card: &Card, rng: &mut R) -> String {
        format!(
            "{}\n{}\n{}",
            self.paint("Card information:", LABEL_STYLE),
            SEPARATOR,
            self.render_card(card, rng)
        )
    }

    /// Output of the list command
    pub fn render_list<R: Rng + ?Sized>(&self, user: &str, cards: &[Card], rng: &mut R) -> String {
        let mut output = self.paint(&format!("{}'s collection:", user), LABEL_STYLE);
        for card in cards {
            output.push('\n');
            output.push_str(SEPARATOR);
            output.push('\n');
            output.push_str(&self.render_card(card, rng));
        }
        output
    }

    /// Render a color name in its own style
    pub fn render_color<R: Rng + ?Sized>(&self, color: Color, rng: &mut R) -> String {
        if !color.is_multicolor() {
            let style = term_color(color).unwrap_or(LABEL_STYLE);
            return self.paint(color.as_str(), style);
        }
        if !self.colorize {
            return color.as_str().to_string();
        }
        color
            .as_str()
            .chars()
            .map(|letter| {
                let style = MULTICOLOR_PALETTE[rng.gen_range(0..MULTICOLOR_PALETTE.len())];
                letter.to_string().with(style).to_string()
            })
            .collect()
    }

    /// Status line for an operation that went through
    pub fn success(&self, message: &str) -> String {
        self.paint(message, LABEL_STYLE)
    }

    /// Status line for an operation that was refused
    pub fn failure(&self, message: &str) -> String {
        self.paint(message, FAILURE_STYLE)
    }

    fn line(&self, label: &str, value: &str) -> String {
        self.paint(&format!("{}: {}", label, value), LABEL_STYLE)
    }

    fn paint(&self, text: &str, style: TermColor) -> String {
        if self.colorize {
            text.with(style).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::plain()
    }
}

fn display_optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
