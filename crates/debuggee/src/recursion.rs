//! Deep call stacks for stack-walking tests.
//!
//! Both functions recurse without loops and carry nothing but the countdown, so
//! at the marked point there is exactly one frame per level plus the entry frame.
//! The work after each recursive call keeps the optimizer from turning the
//! recursion into a loop.

use std::hint::black_box;

/// Depth used by the `deep-recursion` scenario.
pub const SCENARIO_DEPTH: u32 = 50;

#[inline(never)]
pub fn descend(levels_to_go: u32) {
    if levels_to_go > 0 {
        descend(levels_to_go - 1);
    } else {
        black_box(levels_to_go); // #BP2
        #[cfg(test)]
        tests::record_bottom();
    }
    black_box(levels_to_go);
}

/// Same shape as [`descend`], running `at_bottom` at the marked point and
/// handing its result back up the stack.
#[inline(never)]
pub fn descend_then<R, F: FnOnce() -> R>(levels_to_go: u32, at_bottom: F) -> R {
    let out = if levels_to_go > 0 {
        descend_then(levels_to_go - 1, at_bottom)
    } else {
        at_bottom()
    };
    black_box(levels_to_go);
    out
}
