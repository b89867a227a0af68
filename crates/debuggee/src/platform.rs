//! Process-level setup that has to happen before any scenario runs.

/// Let any process ptrace this one.
///
/// Under Yama `ptrace_scope = 1` only ancestors may attach; a debugger that
/// attaches by pid to an already running harness is usually not one.
#[cfg(target_os = "linux")]
pub fn allow_any_tracer() {
    const PR_SET_PTRACER_ANY: libc::c_ulong = libc::c_ulong::MAX;
    let unused: libc::c_ulong = 0;
    let rc = unsafe {
        libc::prctl(
            libc::PR_SET_PTRACER,
            PR_SET_PTRACER_ANY,
            unused,
            unused,
            unused,
        )
    };
    if rc != 0 {
        // EINVAL when Yama is not built in; nothing to relax then.
        tracing::debug!(
            error = %std::io::Error::last_os_error(),
            "prctl(PR_SET_PTRACER) failed"
        );
    }
}

#[cfg(not(target_os = "linux"))]
pub fn allow_any_tracer() {}
