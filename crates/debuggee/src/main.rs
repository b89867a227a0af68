use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;
use debuggee::config::HarnessConfig;
use debuggee::{dispatch, fault, logging, platform, Outcome, ScenarioError};

/// Exit status for usage errors and failed checks (-1 as seen by the OS).
const FAILURE_STATUS: u8 = 255;

#[derive(Parser)]
#[command(name = "debuggee")]
#[command(about = "Scenario harness for debugger tests.", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Scenario name followed by its parameters, passed through verbatim.
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

impl Cli {
    /// Parse with an escape in front of the user's arguments, so every token
    /// after the program name (a leading `--` included) lands in `args` as is.
    fn try_parse_verbatim<I>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv = argv.into_iter();
        let program = argv.next().unwrap_or_else(|| OsString::from("debuggee"));
        Cli::try_parse_from(
            std::iter::once(program)
                .chain(std::iter::once(OsString::from("--")))
                .chain(argv),
        )
    }
}

fn main() -> ExitCode {
    let config = HarnessConfig::from_env();
    logging::init(config.log_filter.as_deref());
    fault::install_panic_hook();
    platform::allow_any_tracer();

    match try_main(&config) {
        Ok(code) => code,
        Err(ScenarioError::Usage(msg)) => {
            println!("{msg}");
            ExitCode::from(FAILURE_STATUS)
        }
        // Unwinds out of main: the hook reports it and the runtime exits with 101.
        Err(err) => std::panic::panic_any(err),
    }
}

fn try_main(config: &HarnessConfig) -> Result<ExitCode, ScenarioError> {
    let cli = Cli::try_parse_verbatim(std::env::args_os())
        .map_err(|err| ScenarioError::Usage(err.to_string()))?;

    match dispatch(config, &cli.args)? {
        Outcome::Completed | Outcome::Unknown => Ok(ExitCode::SUCCESS),
        Outcome::CheckFailed => {
            tracing::debug!("environment check failed");
            Ok(ExitCode::from(FAILURE_STATUS))
        }
    }
}
