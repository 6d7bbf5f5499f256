use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "recuerda",
    version,
    about = "Voice-driven reminder assistant with AI-assisted task parsing"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive listening session (default if no subcommand)
    Listen,

    /// Parse a single utterance and print the extracted task as JSON
    Parse {
        /// Transcript text to parse
        text: String,

        /// Attempt remote AI analysis before local parsing
        #[arg(long)]
        ai: bool,
    },

    /// List stored reminders
    List,

    /// Write a commented default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
