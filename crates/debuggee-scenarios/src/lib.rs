//! Shared scenario registry.
//!
//! This crate exists so both:
//! - the `debuggee` harness (dispatch)
//! - debugger test suites written in Rust
//!
//! can share an authoritative list of scenario names and what each one does to the
//! process (returns, never returns, or faults).

/// How a fault scenario ends the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Store through address zero (data fault).
    InvalidAddress,
    /// Indirect call to address zero (control-flow fault).
    InvalidCallTarget,
    /// Uncaught structured error: unwind, then terminate.
    PropagatedError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Runs to completion and returns an exit status.
    Returns,
    /// Keeps running until an external supervisor stops the process.
    NeverReturns,
    /// Terminates the process abnormally.
    Faults(FaultKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    FaultAddress,
    FaultCall,
    FaultError,
    DeepRecursion,
    ThreadRendezvous,
    ThreadRendezvousLong,
    EnvironmentDump,
    EnvironmentCheck,
    InfiniteLoop,
    EchoLoop,
    VariableState,
    VariableStateUpdate,
    CrossModuleCall,
    CrossModuleCallNoDylib,
    PathEdgeCases,
    Disassembly,
    BulkOutput,
    StreamProbe,
    NumericFiller,
    SpawnChild,
    Sleep,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 21] = [
        ScenarioId::FaultAddress,
        ScenarioId::FaultCall,
        ScenarioId::FaultError,
        ScenarioId::DeepRecursion,
        ScenarioId::ThreadRendezvous,
        ScenarioId::ThreadRendezvousLong,
        ScenarioId::EnvironmentDump,
        ScenarioId::EnvironmentCheck,
        ScenarioId::InfiniteLoop,
        ScenarioId::EchoLoop,
        ScenarioId::VariableState,
        ScenarioId::VariableStateUpdate,
        ScenarioId::CrossModuleCall,
        ScenarioId::CrossModuleCallNoDylib,
        ScenarioId::PathEdgeCases,
        ScenarioId::Disassembly,
        ScenarioId::BulkOutput,
        ScenarioId::StreamProbe,
        ScenarioId::NumericFiller,
        ScenarioId::SpawnChild,
        ScenarioId::Sleep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioId::FaultAddress => "fault-address",
            ScenarioId::FaultCall => "fault-call",
            ScenarioId::FaultError => "fault-error",
            ScenarioId::DeepRecursion => "deep-recursion",
            ScenarioId::ThreadRendezvous => "thread-rendezvous",
            ScenarioId::ThreadRendezvousLong => "thread-rendezvous-long",
            ScenarioId::EnvironmentDump => "environment-dump",
            ScenarioId::EnvironmentCheck => "environment-check",
            ScenarioId::InfiniteLoop => "infinite-loop",
            ScenarioId::EchoLoop => "echo-loop",
            ScenarioId::VariableState => "variable-state",
            ScenarioId::VariableStateUpdate => "variable-state-update",
            ScenarioId::CrossModuleCall => "cross-module-call",
            ScenarioId::CrossModuleCallNoDylib => "cross-module-call-no-dylib",
            ScenarioId::PathEdgeCases => "path-edge-cases",
            ScenarioId::Disassembly => "disassembly",
            ScenarioId::BulkOutput => "bulk-output",
            ScenarioId::StreamProbe => "stream-probe",
            ScenarioId::NumericFiller => "numeric-filler",
            ScenarioId::SpawnChild => "spawn-child",
            ScenarioId::Sleep => "sleep",
        }
    }

    /// Exact, case-sensitive lookup. Surrounding whitespace is significant too:
    /// `" sleep"` is not a scenario.
    pub fn parse(s: &str) -> Option<Self> {
        ScenarioId::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn behavior(self) -> Behavior {
        match self {
            ScenarioId::FaultAddress => Behavior::Faults(FaultKind::InvalidAddress),
            ScenarioId::FaultCall => Behavior::Faults(FaultKind::InvalidCallTarget),
            ScenarioId::FaultError => Behavior::Faults(FaultKind::PropagatedError),
            ScenarioId::InfiniteLoop => Behavior::NeverReturns,
            _ => Behavior::Returns,
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            ScenarioId::FaultAddress => "write through address zero",
            ScenarioId::FaultCall => "call through a null code address",
            ScenarioId::FaultError => "raise an uncaught structured error",
            ScenarioId::DeepRecursion => "recurse 50 frames deep",
            ScenarioId::ThreadRendezvous => "spawn 15 workers and join them",
            ScenarioId::ThreadRendezvousLong => "spawn 15 long-lived workers and join them",
            ScenarioId::EnvironmentDump => "print every inherited environment entry",
            ScenarioId::EnvironmentCheck => "compare NAME VALUE pairs with the environment",
            ScenarioId::InfiniteLoop => "print a counter once a second, forever",
            ScenarioId::EchoLoop => "echo stdin lines until an empty line",
            ScenarioId::VariableState => "build a diverse set of locals for inspection",
            ScenarioId::VariableStateUpdate => "grow a vector one element per iteration",
            ScenarioId::CrossModuleCall => "call into the dynamically loaded module",
            ScenarioId::CrossModuleCallNoDylib => "header calls without loading a module",
            ScenarioId::PathEdgeCases => "call functions compiled from unusual source paths",
            ScenarioId::Disassembly => "call a function meant to be viewed as machine code",
            ScenarioId::BulkOutput => "write 1000 lines to stdout",
            ScenarioId::StreamProbe => "write one line to stdout and one to stderr",
            ScenarioId::NumericFiller => "render a small mandelbrot set",
            ScenarioId::SpawnChild => "re-run self as a sleeping child and wait",
            ScenarioId::Sleep => "sleep for ten seconds",
        }
    }

    /// True if the scenario is expected to end with an abnormal termination.
    pub fn is_fault(self) -> bool {
        matches!(self.behavior(), Behavior::Faults(_))
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
