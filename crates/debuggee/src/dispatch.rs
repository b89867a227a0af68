//! Scenario name to behavior.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::anyhow;
use debuggee_scenarios::{FaultKind, ScenarioId};

use crate::bridge::{self, ModuleLocator, SystemLoader};
use crate::config::HarnessConfig;
use crate::error::ScenarioError;
use crate::{env_probe, fault, filler, recursion, rendezvous, vars};

pub const NO_SCENARIO: &str = "No testcase was specified.";
pub const UNKNOWN_SCENARIO: &str = "Unknown testcase.";

pub const SLEEP_SECONDS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The name matched no scenario. Not a failure.
    Unknown,
    /// `environment-check` found a mismatch (or was given nothing to check).
    CheckFailed,
}

/// `args` excludes the program name: `args[0]` is the scenario name and the rest
/// are forwarded to it unchanged.
pub fn dispatch(config: &HarnessConfig, args: &[String]) -> Result<Outcome, ScenarioError> {
    let Some((name, params)) = args.split_first() else {
        return Err(ScenarioError::Usage(NO_SCENARIO.to_string()));
    };

    let Some(id) = ScenarioId::parse(name) else {
        tracing::debug!(name = %name, "unknown scenario");
        println!("{UNKNOWN_SCENARIO}");
        return Ok(Outcome::Unknown);
    };

    tracing::debug!(scenario = %id, params = params.len(), "running scenario");
    run(id, params, config)
}

pub fn run(
    id: ScenarioId,
    params: &[String],
    config: &HarnessConfig,
) -> Result<Outcome, ScenarioError> {
    match id {
        ScenarioId::FaultAddress => fault::inject(FaultKind::InvalidAddress),
        ScenarioId::FaultCall => fault::inject(FaultKind::InvalidCallTarget),
        ScenarioId::FaultError => fault::inject(FaultKind::PropagatedError),
        ScenarioId::DeepRecursion => recursion::descend(recursion::SCENARIO_DEPTH),
        ScenarioId::ThreadRendezvous => {
            let report =
                rendezvous::run(rendezvous::SCENARIO_WORKERS, rendezvous::SCENARIO_LINGER)?;
            tracing::debug!(workers = report.workers.len(), "rendezvous done");
        }
        ScenarioId::ThreadRendezvousLong => {
            rendezvous::run(
                rendezvous::SCENARIO_WORKERS,
                rendezvous::SCENARIO_LONG_LINGER,
            )?;
        }
        ScenarioId::EnvironmentDump => {
            env_probe::dump_all(&mut io::stdout().lock())?;
        }
        ScenarioId::EnvironmentCheck => {
            let pairs = env_probe::pairs_from_params(params);
            if !env_probe::check_all(&pairs, &mut io::stdout().lock())? {
                return Ok(Outcome::CheckFailed);
            }
        }
        ScenarioId::InfiniteLoop => filler::infinite_loop(),
        ScenarioId::EchoLoop => {
            filler::echo_loop(&mut io::stdin().lock(), &mut io::stdout().lock())?;
        }
        ScenarioId::VariableState => {
            vars::build_and_hold(vars::SCENARIO_ITERATIONS);
        }
        ScenarioId::VariableStateUpdate => {
            vars::build_and_update(vars::SCENARIO_ITERATIONS);
        }
        ScenarioId::CrossModuleCall => {
            crate::dir1::debuggee::header_fn1(1);
            crate::dir2::debuggee::header_fn2(2);
            io::stdout().flush()?;
            bridge::invoke_remote(
                &SystemLoader,
                &ModuleLocator::from_config(config),
                bridge::MODULE_BASE_NAME,
                bridge::ENTRY_SYMBOL,
            )?;
        }
        ScenarioId::CrossModuleCallNoDylib => {
            crate::dir1::debuggee::header_fn1(1);
            crate::dir2::debuggee::header_fn2(2);
        }
        ScenarioId::PathEdgeCases => filler::path_edge_cases(),
        ScenarioId::Disassembly => filler::disassembly(),
        ScenarioId::BulkOutput => {
            filler::bulk_output(&mut io::stdout().lock(), filler::SPAM_LINES)?;
        }
        ScenarioId::StreamProbe => filler::stream_probe()?,
        ScenarioId::NumericFiller => {
            filler::mandelbrot(&filler::MandelbrotPlan::default(), &mut io::stdout().lock())?;
        }
        ScenarioId::SpawnChild => {
            let exe = config
                .exe
                .as_deref()
                .ok_or_else(|| anyhow!("cannot determine the path of the running executable"))?;
            filler::spawn_child(exe)?;
        }
        ScenarioId::Sleep => filler::sleep(Duration::from_secs(SLEEP_SECONDS)),
    }
    Ok(Outcome::Completed)
}
