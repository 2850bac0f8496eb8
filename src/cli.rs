mod help_text;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Monitor parts of web pages for changes
#[derive(Parser, Debug)]
#[command(name = "webwatch", version, about, long_about = help_text::ROOT_LONG_ABOUT)]
pub struct Cli {
    /// Change to directory before operating
    #[arg(short = 'C', global = true, value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "PATH",
        default_value = crate::config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Increase log verbosity (-v for info, -vv for debug). Takes precedence over RUST_LOG.
    #[arg(
        short,
        long,
        global = true,
        verbatim_doc_comment,
        action = clap::ArgAction::Count,
        conflicts_with = "log_level"
    )]
    pub verbose: u8,

    /// Set an explicit log level (error, warn, info, debug, trace). Takes precedence over RUST_LOG.
    #[arg(long, global = true, value_name = "LEVEL", verbatim_doc_comment)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check configured watches and notify on changes or anomalies
    #[command(long_about = help_text::CHECK_LONG_ABOUT)]
    Check {
        /// Only check the watch with this label
        #[arg(long, value_name = "LABEL")]
        label: Option<String>,

        /// Print would-be notifications to stdout instead of sending mail
        #[arg(long)]
        no_mail: bool,
    },

    /// Show the persisted state store (label, fingerprint, last check time)
    #[command(long_about = help_text::STATUS_LONG_ABOUT)]
    Status {},
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
