use clap::{Args, Parser, Subcommand};

use crate::config::PlaybackBackend;
use crate::provider::Offsets;

#[derive(Parser, Debug)]
#[command(name = "prayeralarm", version, author, about = "Plays the adhan at each prayer time of the month")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for values from config.toml
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// City for which adhan timings are retrieved
    #[arg(long, global = true)]
    pub city: Option<String>,
    /// Country for which adhan timings are retrieved
    #[arg(long, global = true)]
    pub country: Option<String>,
    /// Comma separated minute offsets for fajr,dhuhr,asr,maghrib,isha
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub offsets: Option<Offsets>,
    /// Year of adhan playback (defaults to the current year)
    #[arg(long, global = true)]
    pub year: Option<i32>,
    /// Month of adhan playback (defaults to the current month)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Playback backend
    #[arg(long, global = true, value_enum)]
    pub player: Option<PlaybackBackend>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scheduler without the dashboard, logging to stderr
    Run,
    /// Fetch and print this month's upcoming prayer calls
    Times {
        /// Print the timetable as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prayeralarm",
            "run",
            "--city",
            "Perth",
            "--offsets",
            "-1,0,0,2,0",
            "--month",
            "12",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert_eq!(cli.overrides.city.as_deref(), Some("Perth"));
        assert_eq!(cli.overrides.offsets.unwrap().fajr, -1);
        assert_eq!(cli.overrides.month, Some(12));
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert!(Cli::try_parse_from(["prayeralarm", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["prayeralarm", "--offsets", "0,0"]).is_err());
    }

    #[test]
    fn no_subcommand_means_dashboard() {
        let cli = Cli::try_parse_from(["prayeralarm", "--player", "command"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.overrides.player, Some(PlaybackBackend::Command));
    }
}
