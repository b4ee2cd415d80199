//! Command line argument parsing

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::models::ExcludeSet;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(name = "teensybrew")]
#[command(about = "🍺 Build Arduino and MicroPython projects and flash them to a Teensy")]
pub struct Cli {
    /// Project folder; its entry point is main.ino, main.py or boot.py
    #[arg(short = 'p', long = "project", global = true, value_name = "FOLDERNAME")]
    pub project: Option<PathBuf>,

    /// Teensy board name, e.g. teensyLC or teensy31
    #[arg(short = 'd', long = "device", global = true, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Upload the compiled image to the single attached Teensy
    #[arg(short = 'u', long, global = true)]
    pub upload: bool,

    /// Remove earlier build output before building
    #[arg(short = 'c', long, global = true)]
    pub clear: bool,

    /// Serial numbers of Teensies to leave alone
    #[arg(
        short = 'e',
        long = "exclude",
        global = true,
        value_name = "SERIAL_NUMBERS",
        value_delimiter = ','
    )]
    pub exclude: Vec<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Emit log records as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Build the project, and upload it with --upload (default)
    Build,
    /// Remove earlier build output for the project
    Clean,
    /// List attached Teensies
    Devices,
    /// List known boards and the build variables they need
    Boards,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn exclude_set(&self) -> ExcludeSet {
        self.exclude.iter().collect()
    }

    /// The project folder, or a usage error when it was not given
    pub fn require_project(&self) -> Result<&Path, clap::Error> {
        self.project.as_deref().ok_or_else(|| {
            Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "the project folder is required: --project <FOLDERNAME>",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "teensybrew", "-p", "blink", "-d", "teensy31", "-u", "-c", "-e", "1743330,2097150",
        ])
        .unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("blink")));
        assert_eq!(cli.device.as_deref(), Some("teensy31"));
        assert!(cli.upload);
        assert!(cli.clear);
        assert_eq!(cli.exclude, vec!["1743330", "2097150"]);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_exclude_set_drops_blanks() {
        let cli = Cli::try_parse_from(["teensybrew", "--exclude", "1743330,,"]).unwrap();
        let exclude = cli.exclude_set();
        assert_eq!(exclude.len(), 1);
        assert!(exclude.contains("1743330"));
    }

    #[test]
    fn test_missing_project_is_usage_error() {
        let cli = Cli::try_parse_from(["teensybrew", "build"]).unwrap();
        let err = cli.require_project().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["teensybrew", "clean", "--project", "blink", "-vv"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Clean));
        assert_eq!(cli.project, Some(PathBuf::from("blink")));
        assert_eq!(cli.verbose, 2);
    }
}
