//! Harness configuration.
//!
//! The harness has no configuration files: everything comes from the inherited
//! environment and is read once at startup.

use std::ffi::OsString;
use std::path::PathBuf;

/// Tracing filter directive, e.g. `debug` or `debuggee::rendezvous=trace`.
pub const LOG_ENV: &str = "DEBUGGEE_LOG";

/// Explicit path of the dynamically loaded module, bypassing the lookup next to
/// the executable.
pub const SHAREDLIB_ENV: &str = "DEBUGGEE_SHAREDLIB";

#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    pub log_filter: Option<String>,
    pub sharedlib_override: Option<PathBuf>,
    /// Path of the running executable, when the platform can report it.
    pub exe: Option<PathBuf>,
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::from_lookup(|key| std::env::var_os(key));
        cfg.exe = std::env::current_exe().ok();
        cfg
    }

    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        HarnessConfig {
            log_filter: non_empty(LOG_ENV).map(|v| v.to_string_lossy().into_owned()),
            sharedlib_override: non_empty(SHAREDLIB_ENV).map(PathBuf::from),
            exe: None,
        }
    }
}
