mod convert;
mod fixtures;
mod list;

pub use convert::ConvertCommand;
pub use list::ListCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Configuration file name, looked up in the working directory and never
/// read as a descriptor fixture.
pub(crate) const CONFIG_FILE: &str = "dtoshape.toml";

/// dtoshape - DTO descriptors to TypeScript declarations
#[derive(Parser)]
#[command(name = "dtoshape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a root type and everything it references.
    Convert(ConvertCommand),

    /// List the types available in descriptor fixtures.
    List(ListCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Convert(cmd) => cmd.execute(),
            Commands::List(cmd) => cmd.execute(),
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the default level.
pub(crate) fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
        .with_writer(std::io::stderr)
        .try_init();
}
