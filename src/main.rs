use std::{io::Write, path::PathBuf};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use setlistcli::{cli, config, error, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  args_conflicts_with_subcommands = true // `completions` takes no scrape options
)]
struct Cli {
    /// Artist to scrape, e.g. "Pearl Jam"
    artist: Option<String>,

    /// Take the best search match instead of asking
    #[clap(long)]
    first: bool,

    /// Directory for the CSV output (default: $SETLISTCLI_OUTPUT_DIR or data/raw)
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

/// Shown when no artist was given.
fn print_usage<W: Write>(out: &mut W) {
    if let Err(e) = Cli::command().write_help(out) {
        warning!("Cannot print help. Err: {}", e);
    }
}

fn main() {
    if let Err(e) = config::load_env() {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let Some(artist) = cli.artist.filter(|a| !a.trim().is_empty()) else {
        print_usage(&mut std::io::stdout());
        std::process::exit(2);
    };

    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = std::time::Duration::from_secs(secs);
    }

    cli::fetch(&config, &artist, cli.first);
}
