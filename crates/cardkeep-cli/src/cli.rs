//! Command-line interface for the cardkeep utility
//!
//! Parses subcommands into collection operations and prints their outcome
//! as colorized status lines or card blocks.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::Rng;
use std::path::PathBuf;
use tracing::debug;

use cardkeep::core::logging::init_logging;
use cardkeep::prelude::*;

pub const ADDED: &str = "New card added to collection!";
pub const DUPLICATE: &str = "Card already exists in collection!";
pub const NOT_FOUND: &str = "Card not found in collection!";
pub const REMOVED: &str = "Card removed from collection!";
pub const MODIFIED: &str = "Card successfully modified!";
pub const EMPTY: &str = "Collection is empty!";

/// Cardkeep - manage a trading card collection
#[derive(Parser)]
#[command(name = "cardkeep")]
#[command(about = "Add, list, read, update and remove cards in a per-user collection")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding one <user>.json file per collection
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// How update treats zero and empty values
    #[arg(long, value_enum, global = true)]
    pub merge_policy: Option<MergePolicyChoice>,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = AnsiChoice::Auto)]
    pub ansi: AnsiChoice,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off) [default: warn]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json) [default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a card to the collection
    Add {
        #[arg(long, value_parser = Username::parse)]
        user: Username,

        #[command(flatten)]
        card: CardArgs,
    },

    /// List all cards in the collection
    List {
        #[arg(long, value_parser = Username::parse)]
        user: Username,

        /// Print the cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single card
    Read {
        #[arg(long, value_parser = Username::parse)]
        user: Username,

        /// Card ID
        #[arg(long)]
        id: u32,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },

    /// Modify a card; omitted fields keep their value
    Update {
        #[arg(long, value_parser = Username::parse)]
        user: Username,

        /// Card ID
        #[arg(long)]
        id: u32,

        #[command(flatten)]
        fields: PatchArgs,
    },

    /// Remove a card from the collection
    Remove {
        #[arg(long, value_parser = Username::parse)]
        user: Username,

        /// Card ID
        #[arg(long)]
        id: u32,
    },
}

/// Fields of a new card
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CardArgs {
    /// Card ID
    #[arg(long)]
    pub id: u32,

    /// Card name
    #[arg(long)]
    pub name: String,

    /// Mana cost
    #[arg(long, alias = "manaCost")]
    pub mana_cost: u32,

    /// Color
    #[arg(long, value_enum, ignore_case = true)]
    pub color: ColorArg,

    /// Card type, e.g. Creature or Planeswalker
    #[arg(long = "type")]
    pub card_type: String,

    /// Rarity
    #[arg(long)]
    pub rarity: String,

    /// Rules text
    #[arg(long, alias = "rulesText")]
    pub rules_text: String,

    /// Strength (creatures)
    #[arg(long, allow_negative_numbers = true)]
    pub strength: Option<i32>,

    /// Toughness (creatures)
    #[arg(long, allow_negative_numbers = true)]
    pub toughness: Option<i32>,

    /// Loyalty (planeswalkers)
    #[arg(long)]
    pub loyalty: Option<u32>,

    /// Market value
    #[arg(long, alias = "marketValue", allow_negative_numbers = true)]
    pub market_value: Option<f64>,
}

impl From<CardArgs> for Card {
    fn from(args: CardArgs) -> Self {
        Card {
            id: args.id,
            name: args.name,
            mana_cost: args.mana_cost,
            color: args.color.into(),
            card_type: args.card_type,
            rarity: args.rarity,
            rules_text: args.rules_text,
            strength: args.strength,
            toughness: args.toughness,
            loyalty: args.loyalty,
            market_value: args.market_value,
        }
    }
}

/// Replacement values for an existing card
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PatchArgs {
    /// New card name
    #[arg(long)]
    pub name: Option<String>,

    /// New mana cost
    #[arg(long, alias = "manaCost")]
    pub mana_cost: Option<u32>,

    /// New color
    #[arg(long, value_enum, ignore_case = true)]
    pub color: Option<ColorArg>,

    /// New card type
    #[arg(long = "type")]
    pub card_type: Option<String>,

    /// New rarity
    #[arg(long)]
    pub rarity: Option<String>,

    /// New rules text
    #[arg(long, alias = "rulesText")]
    pub rules_text: Option<String>,

    /// New strength
    #[arg(long, allow_negative_numbers = true)]
    pub strength: Option<i32>,

    /// New toughness
    #[arg(long, allow_negative_numbers = true)]
    pub toughness: Option<i32>,

    /// New loyalty
    #[arg(long)]
    pub loyalty: Option<u32>,

    /// New market value
    #[arg(long, alias = "marketValue", allow_negative_numbers = true)]
    pub market_value: Option<f64>,
}

impl From<PatchArgs> for CardPatch {
    fn from(args: PatchArgs) -> Self {
        CardPatch {
            name: args.name,
            mana_cost: args.mana_cost,
            color: args.color.map(Into::into),
            card_type: args.card_type,
            rarity: args.rarity,
            rules_text: args.rules_text,
            strength: args.strength,
            toughness: args.toughness,
            loyalty: args.loyalty,
            market_value: args.market_value,
        }
    }
}

/// Card colors accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
    Multicolor,
}

impl From<ColorArg> for Color {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::White => Color::White,
            ColorArg::Blue => Color::Blue,
            ColorArg::Black => Color::Black,
            ColorArg::Red => Color::Red,
            ColorArg::Green => Color::Green,
            ColorArg::Colorless => Color::Colorless,
            ColorArg::Multicolor => Color::Multicolor,
        }
    }
}

/// Merge policies accepted on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum MergePolicyChoice {
    /// Every supplied value is applied, including 0 and ""
    Explicit,
    /// 0 and "" are ignored and keep the stored value
    Truthy,
}

impl From<MergePolicyChoice> for MergePolicy {
    fn from(value: MergePolicyChoice) -> Self {
        match value {
            MergePolicyChoice::Explicit => MergePolicy::Explicit,
            MergePolicyChoice::Truthy => MergePolicy::Truthy,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum AnsiChoice {
    /// Use colors if stdout is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl AnsiChoice {
    pub fn should_colorize(&self) -> bool {
        match self {
            AnsiChoice::Always => true,
            AnsiChoice::Never => false,
            AnsiChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stdout())
            }
        }
    }
}

/// Main CLI application
pub struct CardkeepApp {
    inventory: Inventory<JsonFileStore>,
    renderer: CardRenderer,
}

impl CardkeepApp {
    pub fn new(config: &Config, renderer: CardRenderer) -> Self {
        Self {
            inventory: cardkeep::open(config),
            renderer,
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(cli: Cli) -> Result<()> {
        // Flags win; init_logging falls back to the environment, then defaults
        let log_level = cli.log_level.map(|level| level.as_str());
        let log_format = cli.log_format.map(|format| format.as_str());

        if let Err(e) = init_logging(log_level, log_format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        let config = Config::resolve(cli.data_dir.as_deref(), cli.merge_policy.map(Into::into));
        debug!(
            data_dir = %config.data_dir.display(),
            merge_policy = %config.merge_policy,
            "Resolved configuration"
        );

        if cli.verbose {
            eprintln!("Cardkeep v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("Data directory: {}", config.data_dir.display());
            eprintln!("Merge policy: {}", config.merge_policy);
        }

        let app = CardkeepApp::new(&config, CardRenderer::new(cli.ansi.should_colorize()));
        let output = app.execute(cli.command, &mut rand::thread_rng())?;
        println!("{}", output);
        Ok(())
    }

    /// Perform one command and return what should be printed
    ///
    /// Refused operations become status lines; only store failures are errors.
    pub fn execute<R: Rng + ?Sized>(&self, command: Commands, rng: &mut R) -> Result<String> {
        match command {
            Commands::Add { user, card } => self.add_command(&user, card.into()),
            Commands::List { user, json } => self.list_command(&user, json, rng),
            Commands::Read { user, id, json } => self.read_command(&user, id, json, rng),
            Commands::Update { user, id, fields } => {
                self.update_command(&user, id, fields.into())
            }
            Commands::Remove { user, id } => self.remove_command(&user, id),
        }
    }

    fn add_command(&self, user: &Username, card: Card) -> Result<String> {
        match self.inventory.add(user, card) {
            Ok(()) => Ok(self.renderer.success(ADDED)),
            Err(e) => self.refusal(e),
        }
    }

    fn list_command<R: Rng + ?Sized>(
        &self,
        user: &Username,
        json: bool,
        rng: &mut R,
    ) -> Result<String> {
        match self.inventory.list(user) {
            Ok(cards) if json => Ok(serde_json::to_string_pretty(&cards)?),
            Ok(cards) => Ok(self.renderer.render_list(user.as_str(), &cards, rng)),
            Err(CollectionError::EmptyCollection { .. }) if json => Ok("[]".to_string()),
            Err(e) => self.refusal(e),
        }
    }

    fn read_command<R: Rng + ?Sized>(
        &self,
        user: &Username,
        id: u32,
        json: bool,
        rng: &mut R,
    ) -> Result<String> {
        match self.inventory.read(user, id) {
            Ok(card) if json => Ok(serde_json::to_string_pretty(&card)?),
            Ok(card) => Ok(self.renderer.render_read(&card, rng)),
            Err(e) => self.refusal(e),
        }
    }

    fn update_command(&self, user: &Username, id: u32, patch: CardPatch) -> Result<String> {
        match self.inventory.update(user, id, &patch) {
            Ok(_) => Ok(self.renderer.success(MODIFIED)),
            Err(e) => self.refusal(e),
        }
    }

    fn remove_command(&self, user: &Username, id: u32) -> Result<String> {
        match self.inventory.remove(user, id) {
            Ok(_) => Ok(self.renderer.success(REMOVED)),
            Err(e) => self.refusal(e),
        }
    }

    /// Turn a refused operation into its status line, passing store failures through
    fn refusal(&self, error: CollectionError) -> Result<String> {
        if !error.is_domain() {
            return Err(error.into());
        }
        let message = match error {
            CollectionError::DuplicateId { .. } => DUPLICATE.to_string(),
            CollectionError::NotFound { .. } => NOT_FOUND.to_string(),
            CollectionError::EmptyCollection { .. } => EMPTY.to_string(),
            CollectionError::InvalidCard(e) => format!("Invalid card: {}", e),
            other => return Err(other.into()),
        };
        Ok(self.renderer.failure(&message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn app(dir: &std::path::Path) -> CardkeepApp {
        CardkeepApp::new(
            &Config::new(dir, MergePolicy::Explicit),
            CardRenderer::plain(),
        )
    }

    fn run(app: &CardkeepApp, args: &[&str]) -> String {
        let mut argv = vec!["cardkeep"];
        argv.extend_from_slice(args);
        app.execute(parse(&argv).command, &mut rand::thread_rng())
            .unwrap()
    }

    const ADD_SHIVAN: &[&str] = &[
        "add", "--user", "alice", "--id", "2", "--name", "Shivan Dragon", "--mana-cost", "6",
        "--color", "red", "--type", "Creature", "--rarity", "Rare", "--rules-text", "Flying",
    ];

    #[test]
    fn test_cli_parsing_add_command() {
        let mut argv = vec!["cardkeep"];
        argv.extend_from_slice(ADD_SHIVAN);
        argv.extend_from_slice(&["--strength", "5", "--market-value", "3.25"]);
        let cli = parse(&argv);

        match cli.command {
            Commands::Add { user, card } => {
                assert_eq!(user.as_str(), "alice");
                assert_eq!(card.id, 2);
                assert_eq!(card.mana_cost, 6);
                assert_eq!(card.color, ColorArg::Red);
                assert_eq!(card.card_type, "Creature");
                assert_eq!(card.strength, Some(5));
                assert_eq!(card.toughness, None);
                assert_eq!(card.market_value, Some(3.25));
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_parsing_camel_case_aliases() {
        let cli = parse(&[
            "cardkeep", "update", "--user", "alice", "--id", "1", "--manaCost", "3",
            "--rulesText", "Trample", "--marketValue", "0.5",
        ]);

        match cli.command {
            Commands::Update { id, fields, .. } => {
                assert_eq!(id, 1);
                assert_eq!(fields.mana_cost, Some(3));
                assert_eq!(fields.rules_text.as_deref(), Some("Trample"));
                assert_eq!(fields.market_value, Some(0.5));
                assert_eq!(fields.name, None);
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn test_cli_parsing_negative_strength() {
        let cli = parse(&[
            "cardkeep", "update", "--user", "alice", "--id", "1", "--strength", "-1",
        ]);
        match cli.command {
            Commands::Update { fields, .. } => assert_eq!(fields.strength, Some(-1)),
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn test_cli_rejects_missing_required_fields() {
        assert!(Cli::try_parse_from(["cardkeep", "add", "--user", "alice", "--id", "1"]).is_err());
        assert!(Cli::try_parse_from(["cardkeep", "read", "--id", "1"]).is_err());
        assert!(Cli::try_parse_from(["cardkeep", "remove", "--user", "alice"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["cardkeep", "read", "--user", "alice", "--id", "x"]).is_err());
        assert!(
            Cli::try_parse_from(["cardkeep", "list", "--user", "../etc"]).is_err(),
            "usernames that escape the data directory are refused"
        );
        assert!(Cli::try_parse_from([
            "cardkeep", "update", "--user", "alice", "--id", "1", "--color", "purple"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parsing_global_options() {
        let cli = parse(&[
            "cardkeep", "--ansi", "never", "list", "--user", "bob", "--data-dir", "/tmp/cards",
            "--merge-policy", "truthy",
        ]);
        assert_eq!(cli.ansi, AnsiChoice::Never);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/cards")));
        assert_eq!(cli.merge_policy, Some(MergePolicyChoice::Truthy));
        assert_eq!(cli.log_level, None);
        assert_eq!(cli.log_format, None);
    }

    #[test]
    fn test_ansi_choice_explicit() {
        assert!(AnsiChoice::Always.should_colorize());
        assert!(!AnsiChoice::Never.should_colorize());
    }

    #[test]
    fn test_add_then_duplicate() {
        let dir = tempdir().unwrap();
        let app = app(dir.path());
        assert_eq!(run(&app, ADD_SHIVAN), ADDED);
        assert_eq!(run(&app, ADD_SHIVAN), DUPLICATE);
    }

    #[test]
    fn test_status_lines_for_missing_cards() {
        let dir = tempdir().unwrap();
        let app = app(dir.path());
        assert_eq!(run(&app, &["list", "--user", "alice"]), EMPTY);
        assert_eq!(run(&app, &["read", "--user", "alice", "--id", "2"]), NOT_FOUND);
        assert_eq!(run(&app, &["remove", "--user", "alice", "--id", "2"]), NOT_FOUND);
        assert_eq!(
            run(&app, &["update", "--user", "alice", "--id", "2", "--name", "X"]),
            NOT_FOUND
        );
    }

    #[test]
    fn test_update_then_read() {
        let dir = tempdir().unwrap();
        let app = app(dir.path());
        run(&app, ADD_SHIVAN);
        assert_eq!(
            run(&app, &["update", "--user", "alice", "--id", "2", "--mana-cost", "7"]),
            MODIFIED
        );
        let output = run(&app, &["read", "--user", "alice", "--id", "2"]);
        assert!(output.contains("Mana Cost: 7"));
        assert!(output.contains("Name: Shivan Dragon"));
    }

    #[test]
    fn test_invalid_update_is_reported() {
        let dir = tempdir().unwrap();
        let app = app(dir.path());
        run(&app, ADD_SHIVAN);
        let output = run(
            &app,
            &["update", "--user", "alice", "--id", "2", "--market-value", "-4"],
        );
        assert!(output.starts_with("Invalid card:"));
    }

    #[test]
    fn test_json_output() {
        let dir = tempdir().unwrap();
        let app = app(dir.path());
        assert_eq!(run(&app, &["list", "--user", "alice", "--json"]), "[]");
        run(&app, ADD_SHIVAN);

        let card: Card =
            serde_json::from_str(&run(&app, &["read", "--user", "alice", "--id", "2", "--json"]))
                .unwrap();
        assert_eq!(card.name, "Shivan Dragon");

        let cards: Vec<Card> =
            serde_json::from_str(&run(&app, &["list", "--user", "alice", "--json"])).unwrap();
        assert_eq!(cards, vec![card]);
    }

    #[test]
    fn test_store_failure_is_an_error() {
        let dir = tempdir().unwrap();
        // A regular file where the data directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let app = app(&blocker);

        let mut argv = vec!["cardkeep"];
        argv.extend_from_slice(ADD_SHIVAN);
        let result = app.execute(parse(&argv).command, &mut rand::thread_rng());
        assert!(result.is_err());
    }
}
