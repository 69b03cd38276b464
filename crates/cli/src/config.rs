//! Command-line configuration.

use clap::Parser;

use crate::commands::{Command, CommandResult};

/// Consistent hash ring toolkit.
#[derive(Parser, Debug)]
#[command(name = "hashring", version, about)]
pub struct CliConfig {
    /// More logging (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(&self) -> anyhow::Result<CommandResult> {
        self.command.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let quiet = CliConfig::try_parse_from(["hashring", "migrate"]).unwrap();
        assert_eq!(quiet.log_level(), "warn");

        let loud = CliConfig::try_parse_from(["hashring", "-vv", "migrate"]);
        assert_eq!(loud.unwrap().log_level(), "trace");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliConfig::try_parse_from(["hashring"]).is_err());
    }
}
