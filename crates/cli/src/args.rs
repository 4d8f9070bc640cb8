//! Command line arguments.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use meteor_core::NoradId;

use crate::detach::DETACHED_FLAG;

const TLE_FLAG: &str = "--tle";

/// Options that end a run of `--tle` words.
const OPTIONS: &[&str] = &[
    "--id",
    "--sat-id",
    "--sat_id",
    "--config",
    "-c",
    "--foreground",
    DETACHED_FLAG,
    "--help",
    "-h",
    "--version",
    "-V",
];

/// Post-observation processing of Meteor-M LRPT recordings.
///
/// Meant to be run by the station client after each pass as
/// `process-meteor --id {{ID}} --tle {{TLE}}`.
#[derive(Parser, Debug)]
#[command(name = "process-meteor")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Observation id assigned by the scheduler
    #[arg(long)]
    pub id: u64,

    /// TLE of the observed satellite, as any number of words
    #[arg(long, num_args = 0.., allow_hyphen_values = true)]
    pub tle: Vec<String>,

    /// NORAD id of the satellite; overrides the TLE and skips the wait
    #[arg(long = "sat-id", alias = "sat_id")]
    pub sat_id: Option<NoradId>,

    /// Path to the configuration file
    #[arg(short, long, env = "METEOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stay in the foreground instead of detaching
    #[arg(long)]
    pub foreground: bool,

    /// Set on the background copy of the process
    #[arg(long, hide = true)]
    pub detached: bool,
}

impl Args {
    /// Parses the process arguments.
    pub fn from_env() -> Self {
        Self::parse_from(tle_last(std::env::args_os()))
    }

    pub fn tle_text(&self) -> Option<String> {
        (!self.tle.is_empty()).then(|| self.tle.join(" "))
    }
}

fn is_option(word: &OsString) -> bool {
    let Some(word) = word.to_str() else {
        return false;
    };
    OPTIONS.iter().any(|option| {
        word == *option
            || word
                .strip_prefix(option)
                .is_some_and(|rest| option.starts_with("--") && rest.starts_with('='))
    })
}

/// Moves the `--tle` words to the end of the argument list.
///
/// TLE fields may start with a hyphen, so `--tle` takes every following word
/// as a value. Options given after the TLE are pulled back out so they are
/// not read as TLE text. The first element (program name) stays in place.
pub fn tle_last<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut options = Vec::new();
    let mut tle = Vec::new();
    let mut in_tle = false;
    let mut seen_tle = false;

    for word in args {
        if word == TLE_FLAG {
            in_tle = true;
            seen_tle = true;
        } else if in_tle && !is_option(&word) {
            tle.push(word);
        } else {
            in_tle = false;
            options.push(word);
        }
    }

    if seen_tle {
        options.push(OsString::from(TLE_FLAG));
        options.extend(tle);
    }
    options
}
