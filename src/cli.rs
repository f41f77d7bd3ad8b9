//! Command-line interface definition

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::ZoneType;
use crate::options::OptionFlags;

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "tdns")]
#[command(about = "tdns is a CLI tool for managing DNS zones")]
#[command(long_about = "tdns is a CLI tool to manage Technitium DNS server via API endpoint")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// API token (overrides config file)
    #[arg(short, long, env = "TDNS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API endpoint (overrides config file)
    #[arg(short, long, env = "TDNS_HOST", global = true)]
    pub endpoint: Option<String>,

    /// Path to a config.json file (default: ./config.json, then ~/.tdns/config.json)
    #[arg(long, env = "TDNS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an initial config.json file in the current directory
    Init {
        /// Write ~/.tdns/config.json instead
        #[arg(long)]
        global: bool,
    },

    /// List all DNS zones
    List {
        /// Output raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Create one or more DNS zones
    #[command(visible_alias = "cr")]
    Create(CreateArgs),

    /// Delete a DNS zone
    Delete {
        zone: String,
    },

    /// Enable DNS zone(s)
    #[command(visible_alias = "en")]
    Enable {
        #[arg(required = true)]
        zones: Vec<String>,
    },

    /// Disable DNS zone(s)
    #[command(visible_alias = "di")]
    Disable {
        #[arg(required = true)]
        zones: Vec<String>,
    },

    /// Resynchronize one or more DNS zones
    Resync {
        #[arg(required = true)]
        zones: Vec<String>,
    },

    /// Convert zone type
    #[command(visible_alias = "co")]
    Convert {
        zone: String,

        /// Target zone type (Primary, Secondary, etc.)
        #[arg(short = 'y', long = "type")]
        zone_type: ZoneType,
    },

    /// Export one or more DNS zones
    Export {
        #[arg(required = true)]
        zones: Vec<String>,

        /// Directory to save exported zone files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the server reply only, without the zone header
        #[arg(long)]
        json: bool,
    },

    /// Import a DNS zone
    #[command(visible_alias = "im")]
    Import {
        zone: String,

        /// Zone file to import
        #[arg(short, long, default_value = "data.txt")]
        file: PathBuf,

        /// Overwrite existing records
        #[arg(long)]
        overwrite: bool,

        /// Print raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Get zone options
    #[command(visible_alias = "go")]
    GetOptions {
        zone: String,

        /// Include available TSIG key names (true|false)
        #[arg(
            long,
            default_value_t = true,
            action = ArgAction::Set,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            alias = "includeAvailableTsigKeyNames"
        )]
        include_available_keys: bool,

        /// Print raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Set zone options via query parameters
    SetOptions(SetOptionsArgs),

    /// Manage zone records
    #[command(visible_alias = "re")]
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },

    /// Interact with logs from the DNS system
    #[command(visible_alias = "lo")]
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },

    /// Manage server settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Administrative commands
    #[command(visible_alias = "ad")]
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(required = true)]
    pub zones: Vec<String>,

    /// Zone type
    #[arg(short = 'y', long = "type", default_value = "Primary")]
    pub zone_type: ZoneType,

    /// Use date-based SOA serial scheme (true|false)
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        alias = "useSoaSerialDateScheme"
    )]
    pub use_soa_serial_date_scheme: bool,

    /// Comma-separated list of primary name server IPs
    #[arg(long, alias = "primaryNameServerAddresses")]
    pub primary_name_server_addresses: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetOptionsArgs {
    pub zone: String,

    /// Path to JSON file; keys become query parameters
    #[arg(short = 'f', long, conflicts_with = "stdin")]
    pub data_file: Option<PathBuf>,

    /// Read JSON from stdin; keys become query parameters
    #[arg(long)]
    pub stdin: bool,

    #[command(flatten)]
    pub flags: OptionFlags,
}

// ============================================================
// Records
// ============================================================

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// List all DNS records for a zone
    #[command(visible_alias = "ge")]
    Get {
        zone: String,

        /// Filter by record type (e.g. A, MX, TXT)
        #[arg(short, long)]
        filter: Option<String>,

        /// Output raw JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Add a new record to a zone
    Add {
        #[command(flatten)]
        target: RecordTarget,

        /// Time to live in seconds (server default when omitted)
        #[arg(long)]
        ttl: Option<u32>,

        /// Overwrite existing record set if present
        #[arg(short, long)]
        overwrite: bool,

        #[command(flatten)]
        data: RecordData,

        /// Output raw JSON of response
        #[arg(long)]
        json: bool,
    },

    /// Delete a record from a zone
    #[command(visible_alias = "rm")]
    Delete {
        #[command(flatten)]
        target: RecordTarget,

        #[command(flatten)]
        data: RecordData,
    },
}

/// Which record set a record command addresses
#[derive(Args, Debug, Clone)]
pub struct RecordTarget {
    /// Zone name
    #[arg(short, long)]
    pub zone: String,

    /// Domain name (defaults to the zone apex)
    #[arg(short = 'n', long)]
    pub domain: Option<String>,

    /// Record type
    #[arg(short = 'r', long = "type")]
    pub record_type: String,
}

/// Type-specific record data
#[derive(Args, Debug, Clone, Default)]
pub struct RecordData {
    /// IP address for A/AAAA records
    #[arg(long, alias = "ipAddress")]
    pub ip_address: Option<String>,

    /// CNAME target
    #[arg(long)]
    pub cname: Option<String>,

    /// Text for TXT records
    #[arg(long)]
    pub text: Option<String>,

    /// Name server for NS records
    #[arg(long, alias = "nameServer")]
    pub name_server: Option<String>,

    /// Mail exchange for MX records
    #[arg(long)]
    pub exchange: Option<String>,

    /// Preference for MX records
    #[arg(long)]
    pub preference: Option<u16>,

    /// Target name for PTR records
    #[arg(long, alias = "ptrName")]
    pub ptr_name: Option<String>,
}

// ============================================================
// Logs
// ============================================================

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// List available log files
    #[command(visible_alias = "ls")]
    List,

    /// Download a specific log file
    #[command(visible_alias = "dl")]
    Download {
        file_name: String,

        /// Optional path to save the downloaded log file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a specific log file
    #[command(visible_aliases = ["de", "rm"])]
    Delete {
        file_name: String,
    },

    /// Delete all log files
    #[command(visible_aliases = ["deleteAll", "da"])]
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

// ============================================================
// Settings
// ============================================================

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Retrieve current server settings
    Get {
        /// Output raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Download a backup zip file of the server settings
    Backup {
        /// Optional path to save the backup zip file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore server settings from a backup zip file
    Restore {
        /// Path to backup zip file to restore
        #[arg(short, long)]
        input: PathBuf,

        /// Output raw JSON response
        #[arg(long)]
        json: bool,
    },
}

// ============================================================
// Admin
// ============================================================

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List active sessions
    #[command(visible_alias = "ls")]
    ListSessions,

    /// Delete a session using its partial token
    #[command(visible_alias = "ds")]
    DeleteSession {
        /// Partial token of the session to delete
        #[arg(short, long)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Create a new API token for a user
    #[command(visible_alias = "ct")]
    CreateToken {
        /// User to create token for
        #[arg(long)]
        user: String,

        /// Name for the new token
        #[arg(long)]
        token_name: String,
    },

    /// List all system users
    #[command(visible_alias = "lu")]
    ListUsers,

    /// Get details for a specific user
    #[command(visible_alias = "gu")]
    GetUser {
        /// User to query
        #[arg(short, long)]
        user: String,
    },

    /// Check for available updates
    #[command(visible_alias = "cu")]
    CheckUpdate,
}
