use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;

use amoshelf::cli::args::{Cli, Commands, CompletionsArgs};
use amoshelf::cli::commands::{self, common};
use amoshelf::config::{Config, Paths};
use amoshelf::error::ShelfError;
use amoshelf::logging;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), ShelfError> {
    let cli = Cli::parse();
    logging::init(cli.verbosity());

    // Handle completions command early (no config or provider needed)
    if let Commands::Completions(CompletionsArgs { shell }) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;
    let format = cli.output_format(&config.output.format);
    // Flags and AMOSHELF_* variables apply to this run only
    let effective = common::apply_overrides(&config, &cli.source)?;

    let output = match &cli.command {
        Commands::Config(args) => commands::config(&paths, &mut config, args, format)?,
        Commands::Collection(args) => {
            commands::collection(&paths, &mut config, &effective, args, format)?
        }
        Commands::Cache(args) => commands::cache::handle(&paths, &effective, args, format)?,
        Commands::List(args) => {
            let provider = common::build_provider(&effective, &paths)?;
            commands::list(&provider, args, format)?
        }
        Commands::Show(args) => {
            let provider = common::build_provider(&effective, &paths)?;
            commands::show(&provider, args, format)?
        }
        Commands::Icon(args) => {
            let provider = common::build_provider(&effective, &paths)?;
            commands::icon(&provider, args, format)?
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    };

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
