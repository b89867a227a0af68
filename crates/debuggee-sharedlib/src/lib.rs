//! Second module of the debuggee: built as a `cdylib` that the harness loads at
//! runtime, and as an `rlib` so the disassembly and path scenarios can call the
//! same functions directly.
//!
//! Every export is `extern "C"` and unmangled so lookups by name work the same
//! from `dlsym`, `GetProcAddress` and a debugger's symbol search.

#![allow(clippy::missing_safety_doc)]

use std::hint::black_box;
use std::io::Write as _;

#[path = "paths/remote/path1.rs"]
mod remote_path1;
#[path = "paths/remote/path2.rs"]
mod remote_path2;
#[path = "paths/relative.rs"]
mod relative;
// Deliberately not normalized: the debug info keeps the `..` and `.` components.
#[path = "paths/../paths/./denorm_path.rs"]
mod denorm;

pub use denorm::denorm_path;
pub use relative::relative_path;
pub use remote_path1::remote_path1;
pub use remote_path2::remote_path2;

/// Line printed by [`sharedlib_entry`]; tests match on it.
pub const ENTRY_BANNER: &str = "sharedlib_entry: hello from debuggee2";

/// Symbol name the harness resolves after loading this module.
pub const ENTRY_SYMBOL: &str = "sharedlib_entry";

// Callers are C-ABI exports with no error channel; a closed stdout is ignored.
pub(crate) fn announce(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{line}");
    let _ = stdout.flush();
}

#[no_mangle]
pub extern "C" fn sharedlib_entry() {
    // Unwinding across the C ABI would abort the loader's process; drop the panic.
    let _ = std::panic::catch_unwind(|| {
        announce(ENTRY_BANNER); // #BP_sharedlib
    });
}

/// Small, branchy, side-effect free routine meant to be stepped by instruction.
#[no_mangle]
#[inline(never)]
pub extern "C" fn disassembly1() {
    let mut acc: u32 = black_box(0);
    for i in 0..black_box(10u32) {
        if i % 3 == 0 {
            acc = acc.wrapping_add(i);
        } else {
            acc = acc.wrapping_mul(3).rotate_left(i);
        }
    }
    black_box(acc);
}
