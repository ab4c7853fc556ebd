use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Browse add-on collections from addons.mozilla.org
#[derive(Parser)]
#[command(name = "amoshelf")]
#[command(version, propagate_version = true)]
#[command(about = "Browse add-on collections from addons.mozilla.org")]
pub struct Cli {
    /// Output format for command results [default: from config, else pretty]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Verbosity level for logging: -1 quiet, 0 default, >0 verbose
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            i8::try_from(self.verbose).unwrap_or(i8::MAX)
        }
    }

    /// Output format, falling back to the configured one
    pub fn output_format(&self, configured: &str) -> OutputFormat {
        self.output
            .or_else(|| <OutputFormat as ValueEnum>::from_str(configured, true).ok())
            .unwrap_or_default()
    }

    /// Print shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    }
}

/// Per-invocation overrides of the configured collection source
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Add-ons server base URL
    #[arg(long, env = "AMOSHELF_SERVER", global = true)]
    pub server: Option<String>,

    /// Account owning the collection
    #[arg(long, env = "AMOSHELF_ACCOUNT", global = true)]
    pub account: Option<String>,

    /// Collection name or id
    #[arg(long, env = "AMOSHELF_COLLECTION", global = true)]
    pub collection: Option<String>,

    /// Read timeout per request, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the add-ons in the collection
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show details of one add-on
    Show(ShowArgs),

    /// Download an add-on's icon
    Icon(IconArgs),

    /// Show or change the collection being browsed
    #[command(alias = "c")]
    Collection(CollectionArgs),

    /// Manage local cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Filter add-ons by name or id
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Maximum number of add-ons to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Ignore the cache and fetch from the server
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Add-on id (guid)
    pub id: String,

    /// Ignore the cache and fetch from the server
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the icon command
#[derive(Args)]
pub struct IconArgs {
    /// Add-on id (guid)
    pub id: String,

    /// File to write the icon to (defaults to <id>.<ext> in the current directory)
    #[arg(short, long)]
    pub save: Option<String>,
}

/// Arguments for the collection command
#[derive(Args)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub command: Option<CollectionCommands>,
}

/// Collection subcommands
#[derive(Subcommand)]
pub enum CollectionCommands {
    /// Show the configured collection
    Show,
    /// Point at another collection
    Set {
        /// Account owning the collection
        #[arg(long = "user", short = 'u')]
        account: Option<String>,
        /// Collection name or id
        #[arg(long = "name", short = 'n')]
        name: Option<String>,
    },
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache status for the configured collection
    Status,
    /// Delete cached data
    Clear {
        /// Clear every cached collection, not just the configured one
        #[arg(long)]
        all: bool,
    },
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., collection.account)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
