//! Scenario harness for debugger tests: each scenario puts the process into a
//! state a debugger test can observe (fault, recursion, live threads, locals,
//! cross-module calls, console traffic).

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod env_probe;
pub mod error;
pub mod fault;
pub mod filler;
pub mod logging;
pub mod platform;
pub mod recursion;
pub mod rendezvous;
pub mod vars;

// Two source files named `debuggee.rs` in different directories.
pub mod dir1 {
    pub mod debuggee;
}
pub mod dir2 {
    pub mod debuggee;
}

pub use dispatch::{dispatch, Outcome};
pub use error::ScenarioError;
