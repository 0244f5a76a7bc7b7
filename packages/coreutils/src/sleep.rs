//! sleep - delay for a specified amount of time

use std::ffi::OsString;
use std::io::Write;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use clap::Parser;
use regex::Regex;
use tracing::debug;

use crate::cli::{self, Command, Utility};
use crate::error::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "sleep", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    #[arg(short = 'h', long = "help")]
    help: bool,
    durations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepOptions {
    pub durations: Vec<Duration>,
}

impl SleepOptions {
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }
}

pub struct Sleep;

impl Utility for Sleep {
    const NAME: &'static str = "sleep";
    const USAGE: &'static str = "usage: sleep [OPTION ...] NUMBER[SUFFIX] ...";
    const HELP: &'static str = "\
Pause for NUMBER seconds. With several NUMBERs, pause for their sum.
NUMBER may be an integer or a decimal number.

SUFFIX selects the unit: 's' for seconds (the default), 'm' for minutes,
'h' for hours. Units may be chained, as in 1m30s.

  -h, --help                print this help message and exit
";

    type Options = SleepOptions;

    fn parse(args: Vec<OsString>) -> Result<Command<SleepOptions>> {
        let args: Args = cli::parse_with(args)?;
        if args.help {
            return Ok(Command::Help);
        }
        if args.durations.is_empty() {
            return Err(Error::usage("missing operand"));
        }
        let durations = args
            .durations
            .iter()
            .map(|token| parse_duration(token))
            .collect::<Result<_>>()?;
        Ok(Command::Run(SleepOptions { durations }))
    }

    fn execute<W: Write>(options: SleepOptions, _out: &mut W) -> Result<()> {
        for duration in options.durations {
            debug!(?duration, "sleeping");
            thread::sleep(duration);
        }
        Ok(())
    }
}

fn segment() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| {
        Regex::new(r"([0-9]+(?:\.[0-9]*)?|\.[0-9]+)([smh])").expect("duration pattern compiles")
    })
}

/// Parse `NUMBER[SUFFIX]`, or a chain such as `1h2m3.5s`.
///
/// A token without any unit letter is read as seconds. Once a unit letter
/// appears, every number in the token needs one.
pub fn parse_duration(token: &str) -> Result<Duration> {
    let invalid = || Error::usage(format!("invalid time interval '{token}'"));

    let with_unit;
    let text = if token.contains(|c: char| matches!(c, 's' | 'm' | 'h')) {
        token
    } else {
        with_unit = format!("{token}s");
        with_unit.as_str()
    };

    let mut seconds = 0f64;
    let mut end = 0;
    for caps in segment().captures_iter(text) {
        let (Some(whole), Some(number), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            return Err(invalid());
        };
        if whole.start() != end {
            return Err(invalid());
        }
        end = whole.end();

        let value: f64 = number.as_str().parse().map_err(|_| invalid())?;
        let scale = match unit.as_str() {
            "h" => 3600.0,
            "m" => 60.0,
            _ => 1.0,
        };
        seconds += value * scale;
    }
    if end == 0 || end != text.len() {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
