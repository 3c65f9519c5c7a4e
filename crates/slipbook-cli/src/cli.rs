//! CLI definition using clap

use clap::{Parser, Subcommand};
use slipbook_domain::model::Sign;
use slipbook_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slipbook")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Truck delivery slips, party ledgers and the purchase book")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage parties
    Party {
        #[command(subcommand)]
        action: PartyAction,
    },

    /// Manage adjustment shortcuts
    Shortcut {
        #[command(subcommand)]
        action: ShortcutAction,
    },

    /// Enter, list and delete deliveries (sub-slips)
    Slip {
        #[command(subcommand)]
        action: SlipAction,
    },

    /// List dates that have deliveries, newest first
    Dates,

    /// Party ledgers (main slips)
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },

    /// Purchase book (adjustments spread over deliveries)
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default dust discount ("1.5", "1", "N")
        #[arg(long)]
        set_discount: Option<String>,

        /// Set currency symbol
        #[arg(long)]
        set_currency: Option<String>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Delete all deliveries and ledgers (parties and shortcuts are kept)
    ResetData {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PartyAction {
    /// List parties
    List,

    /// Add a party
    Add { name: String },

    /// Rename a party
    Rename { id: u32, name: String },

    /// Remove a party without deliveries
    Remove { id: u32 },
}

#[derive(Subcommand)]
pub enum ShortcutAction {
    /// List shortcuts
    List,

    /// Add a shortcut
    Add {
        /// Single-letter code
        code: String,

        /// Description shown on the ledger
        label: String,

        /// + or -
        #[arg(long, allow_hyphen_values = true)]
        sign: Sign,

        /// Show as a purchase book column
        #[arg(long)]
        purchase_book: bool,
    },

    /// Replace a shortcut definition
    Edit {
        /// Code of the shortcut to edit
        code: String,

        /// Description shown on the ledger
        label: String,

        /// + or -
        #[arg(long, allow_hyphen_values = true)]
        sign: Sign,

        /// New code (defaults to the current one)
        #[arg(long)]
        new_code: Option<String>,

        /// Show as a purchase book column
        #[arg(long)]
        purchase_book: bool,
    },

    /// Remove a shortcut
    Remove { code: String },
}

#[derive(Subcommand)]
pub enum SlipAction {
    /// Price and save a delivery
    Add {
        /// Date (YYYY-MM-DD), today if omitted
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Party name
        #[arg(long, short = 'p')]
        party: String,

        /// Truck number
        #[arg(long, short = 't')]
        truck: String,

        /// Gross weight in kg
        #[arg(long, short = 'g')]
        gross: String,

        /// Band weights in entry order, ending with 0 (the last before 0 is dust)
        #[arg(long = "band", short = 'b', allow_hyphen_values = true)]
        bands: Vec<String>,

        /// First rate (per 1000 kg)
        #[arg(long)]
        rate1: String,

        /// Second rate (per 1000 kg)
        #[arg(long, default_value = "0")]
        rate2: String,

        /// Quality adjustment per priced band (per 1000 kg)
        #[arg(long = "quality", short = 'q', allow_hyphen_values = true)]
        quality: Vec<String>,

        /// Dust discount ("1.5", "1", "N"). Uses config value if not specified.
        #[arg(long)]
        discount: Option<String>,

        /// Flat tax amount
        #[arg(long, default_value = "0")]
        tax: String,
    },

    /// List deliveries of a date
    List {
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Limit to one party
        #[arg(long, short = 'p')]
        party: Option<String>,
    },

    /// Delete deliveries matching truck number and final amount
    Delete {
        #[arg(long, short = 'd')]
        date: Option<String>,

        #[arg(long, short = 'p')]
        party: String,

        #[arg(long, short = 't')]
        truck: String,

        /// Final amount of the delivery
        #[arg(long)]
        amount: String,
    },

    /// Delete every delivery of a party on a date
    Clear {
        #[arg(long, short = 'd')]
        date: Option<String>,

        #[arg(long, short = 'p')]
        party: String,
    },
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Show a party's ledger
    Show {
        #[arg(long, short = 'd')]
        date: Option<String>,

        #[arg(long, short = 'p')]
        party: String,
    },

    /// Add operations ("2000 R") and save the ledger
    Add {
        #[arg(long, short = 'd')]
        date: Option<String>,

        #[arg(long, short = 'p')]
        party: String,

        /// Operations, each "<amount> <code>"; "0.0" stops entry
        #[arg(required = true)]
        operations: Vec<String>,
    },

    /// Clear all operations and save the ledger
    Reset {
        #[arg(long, short = 'd')]
        date: Option<String>,

        #[arg(long, short = 'p')]
        party: String,
    },

    /// All saved ledgers of a date
    Summary {
        #[arg(long, short = 'd')]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BookAction {
    /// Show the purchase book of a date
    Show {
        #[arg(long, short = 'd')]
        date: Option<String>,
    },

    /// Export the purchase book of a date to Excel
    Export {
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
