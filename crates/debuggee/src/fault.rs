//! Intentional abnormal terminations.
//!
//! The two hardware faults must stay distinguishable in a core dump or under a
//! debugger: `invalid_address` faults on a data access to address 0 with a valid
//! instruction pointer, `invalid_call_target` faults with the instruction pointer
//! itself at 0. Both are emitted as explicit instructions so no optimization
//! level can fold them away.

use debuggee_scenarios::FaultKind;

use crate::error::ScenarioError;

/// Frames between the scenario entry and the frame that raises.
pub const PROPAGATION_DEPTH: u32 = 3;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{what} (raised {depth} frames below the scenario entry)")]
pub struct FaultError {
    pub what: &'static str,
    pub depth: u32,
}

pub fn inject(kind: FaultKind) -> ! {
    tracing::debug!(?kind, "injecting fault");
    match kind {
        FaultKind::InvalidAddress => invalid_address(),
        FaultKind::InvalidCallTarget => invalid_call_target(),
        FaultKind::PropagatedError => propagated_error(),
    }
}

#[inline(never)]
pub fn invalid_address() -> ! {
    unsafe { store_to_null() }; // #BP_fault_address
    // Only reachable if the store did not trap.
    std::process::abort()
}

#[inline(never)]
pub fn invalid_call_target() -> ! {
    unsafe { call_null() }; // #BP_fault_call
    std::process::abort()
}

/// Raise a [`FaultError`] that nothing catches. The frames in between announce
/// themselves on stderr as they are unwound.
#[inline(never)]
pub fn propagated_error() -> ! {
    raise_through(PROPAGATION_DEPTH)
}

#[inline(never)]
fn raise_through(levels_to_go: u32) -> ! {
    let _trail = UnwindTrail(levels_to_go);
    if levels_to_go == 0 {
        std::panic::panic_any(FaultError {
            what: "error",
            depth: PROPAGATION_DEPTH,
        });
    }
    raise_through(levels_to_go - 1)
}

struct UnwindTrail(u32);

impl Drop for UnwindTrail {
    fn drop(&mut self) {
        if std::thread::panicking() {
            eprintln!("unwinding through frame {}", self.0);
        }
    }
}

#[cfg(target_arch = "x86_64")]
unsafe fn store_to_null() {
    std::arch::asm!(
        "mov dword ptr [{addr}], {val:e}",
        addr = in(reg) 0usize,
        val = in(reg) 42u32,
        options(nostack)
    );
}

#[cfg(target_arch = "aarch64")]
unsafe fn store_to_null() {
    std::arch::asm!(
        "str {val:w}, [{addr}]",
        addr = in(reg) 0usize,
        val = in(reg) 42u32,
        options(nostack)
    );
}

#[cfg(target_arch = "x86_64")]
unsafe fn call_null() {
    std::arch::asm!("call {target}", target = in(reg) 0usize, clobber_abi("C"));
}

#[cfg(target_arch = "aarch64")]
unsafe fn call_null() {
    std::arch::asm!("blr {target}", target = in(reg) 0usize, clobber_abi("C"));
}

// Architectures without an inline-asm path: raise the signal the hardware
// fault would have produced, keeping the two kinds distinct.
#[cfg(all(unix, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
unsafe fn store_to_null() {
    libc::raise(libc::SIGSEGV);
}

#[cfg(all(unix, not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
unsafe fn call_null() {
    libc::raise(libc::SIGILL);
}

#[cfg(all(not(unix), not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
unsafe fn store_to_null() {}

#[cfg(all(not(unix), not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
unsafe fn call_null() {}

/// Render structured panic payloads ([`FaultError`], [`ScenarioError`]) instead
/// of the default `Box<dyn Any>`; everything else goes to the previous hook.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let message = if let Some(err) = payload.downcast_ref::<FaultError>() {
            err.to_string()
        } else if let Some(err) = payload.downcast_ref::<ScenarioError>() {
            err.to_string()
        } else {
            previous(info);
            return;
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(%location, %message, "uncaught error");
        eprintln!("debuggee: uncaught error at {location}: {message}");
    }));
}
