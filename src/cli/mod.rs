use clap::{Parser, Subcommand};

pub mod config;
pub mod console;
pub mod version;

#[derive(Parser)]
#[command(name = "phloem")]
#[command(author = "Phloem Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the Phloem community fund engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive governance console
    Console {
        /// Path to config file (default: <config dir>/phloem/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Display version information
    Version,
}

pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Console { config } => console::execute(config),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
