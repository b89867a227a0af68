use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use debuggee::bridge::{module_file_name, ModuleLocator, MODULE_BASE_NAME};
use debuggee::config::{LOG_ENV, SHAREDLIB_ENV};

fn debuggee_cmd(args: &[&str]) -> Command {
    let exe = env!("CARGO_BIN_EXE_debuggee");
    let mut cmd = Command::new(exe);
    cmd.args(args).env_remove(LOG_ENV).env_remove(SHAREDLIB_ENV);
    cmd
}

fn run_debuggee(args: &[&str]) -> Output {
    debuggee_cmd(args).output().expect("run debuggee")
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn assert_exit(out: &Output, code: i32) {
    assert_eq!(
        out.status.code(),
        Some(code),
        "stdout:\n{}\nstderr:\n{}",
        stdout_of(out),
        stderr_of(out)
    );
}

#[test]
fn no_scenario_is_a_usage_error() {
    let out = run_debuggee(&[]);
    assert_exit(&out, 255);
    assert_eq!(stdout_of(&out), "No testcase was specified.\n");
}

#[test]
fn unknown_scenario_exits_zero() {
    for name in ["nonexistent", "Fault-Address", "fault-address "] {
        let out = run_debuggee(&[name]);
        assert_exit(&out, 0);
        assert_eq!(stdout_of(&out), "Unknown testcase.\n", "{name}");
    }
}

#[test]
fn leading_double_dash_is_the_scenario_name() {
    let out = debuggee_cmd(&["--", "environment-check", "DEBUGGEE_CLI_DASH", "1"])
        .env("DEBUGGEE_CLI_DASH", "1")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 0);
    assert_eq!(stdout_of(&out), "Unknown testcase.\n");
}

#[test]
fn parameters_are_forwarded_verbatim() {
    let out = debuggee_cmd(&["environment-check", "DEBUGGEE_CLI_DASH", "--"])
        .env("DEBUGGEE_CLI_DASH", "--")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 0);
    assert_eq!(stdout_of(&out), "DEBUGGEE_CLI_DASH=--\n");
}

#[test]
fn environment_check_matches_inherited_values() {
    let out = debuggee_cmd(&["environment-check", "DEBUGGEE_CLI_FOO", "bar"])
        .env("DEBUGGEE_CLI_FOO", "bar")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 0);
    assert_eq!(stdout_of(&out), "DEBUGGEE_CLI_FOO=bar\n");

    let out = debuggee_cmd(&["environment-check", "DEBUGGEE_CLI_FOO", "bar"])
        .env("DEBUGGEE_CLI_FOO", "baz")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 255);
    assert_eq!(stdout_of(&out), "DEBUGGEE_CLI_FOO=baz\n");

    let out = debuggee_cmd(&["environment-check", "DEBUGGEE_CLI_FOO", "bar"])
        .env_remove("DEBUGGEE_CLI_FOO")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 255);
    assert_eq!(stdout_of(&out), "DEBUGGEE_CLI_FOO=(null)\n");
}

#[test]
fn environment_dump_lists_inherited_variables() {
    let out = debuggee_cmd(&["environment-dump"])
        .env("DEBUGGEE_CLI_DUMP", "value with spaces")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    assert!(
        stdout.lines().any(|l| l == "DEBUGGEE_CLI_DUMP=value with spaces"),
        "stdout:\n{stdout}"
    );
}

#[test]
fn stream_probe_writes_one_line_per_stream() {
    let out = run_debuggee(&["stream-probe"]);
    assert_exit(&out, 0);
    assert_eq!(out.stdout, b"stdout\n");
    assert_eq!(out.stderr, b"stderr\n");
}

#[test]
fn bulk_output_writes_a_thousand_lines() {
    let out = run_debuggee(&["bulk-output"]);
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    assert_eq!(stdout.lines().count(), 1000);
    assert!(stdout.lines().all(|l| l.starts_with("SPAM SPAM")));
}

#[test]
fn echo_loop_echoes_until_an_empty_line() {
    let mut child = debuggee_cmd(&["echo-loop"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn debuggee");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"one\ntwo\n\nthree\n")
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait debuggee");
    assert_exit(&out, 0);
    assert_eq!(stdout_of(&out), "> : one\n> : two\n> : \n");
}

#[test]
fn returning_scenarios_exit_zero() {
    for name in [
        "deep-recursion",
        "variable-state",
        "variable-state-update",
        "cross-module-call-no-dylib",
        "path-edge-cases",
        "disassembly",
    ] {
        let out = run_debuggee(&[name]);
        assert_exit(&out, 0);
    }
}

#[test]
fn header_functions_run_in_order() {
    let out = run_debuggee(&["cross-module-call-no-dylib"]);
    assert_exit(&out, 0);
    assert_eq!(stdout_of(&out), "header_fn1(1)\nheader_fn2(2)\n");
}

#[test]
fn path_edge_cases_call_all_four_functions() {
    let out = run_debuggee(&["path-edge-cases"]);
    assert_exit(&out, 0);
    assert_eq!(
        stdout_of(&out),
        "remote_path1\nremote_path2\nrelative_path\ndenorm_path\n"
    );
}

#[test]
fn numeric_filler_prints_the_coarse_image() {
    let out = run_debuggee(&["numeric-filler"]);
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    assert_eq!(stdout.lines().count(), 50);
    assert!(stdout.contains('#'));
}

#[test]
fn thread_rendezvous_joins_every_worker_in_order() {
    let out = run_debuggee(&["thread-rendezvous"]);
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    for id in 0..15 {
        assert!(stdout.contains(&format!("I'm thread {id}\n")), "{stdout}");
        assert!(stdout.contains(&format!("Thread {id} exiting\n")), "{stdout}");
    }
    let joins: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("Joining "))
        .collect();
    let expected: Vec<String> = (0..15).map(|id| format!("Joining {id}")).collect();
    assert_eq!(joins, expected);
}

#[test]
fn fault_error_unwinds_then_exits_101() {
    let out = run_debuggee(&["fault-error"]);
    assert_exit(&out, 101);
    let stderr = stderr_of(&out);
    let trail: Vec<&str> = stderr
        .lines()
        .filter(|l| l.starts_with("unwinding through frame"))
        .collect();
    assert_eq!(
        trail,
        vec![
            "unwinding through frame 0",
            "unwinding through frame 1",
            "unwinding through frame 2",
            "unwinding through frame 3",
        ]
    );
    assert!(stderr.contains("debuggee: uncaught error"), "{stderr}");
}

#[test]
fn missing_module_is_fatal() {
    let out = debuggee_cmd(&["cross-module-call"])
        .env(SHAREDLIB_ENV, "/nonexistent/dir/libdebuggee2.so")
        .output()
        .expect("run debuggee");
    assert_exit(&out, 101);
    assert_eq!(stdout_of(&out), "header_fn1(1)\nheader_fn2(2)\n");
    let stderr = stderr_of(&out);
    assert!(stderr.contains("debuggee: uncaught error"), "{stderr}");
    assert!(stderr.contains("/nonexistent/dir/libdebuggee2.so"), "{stderr}");
}

fn built_module() -> Option<PathBuf> {
    let locator = ModuleLocator {
        exe: Some(PathBuf::from(env!("CARGO_BIN_EXE_debuggee"))),
        override_path: None,
    };
    locator
        .candidates(MODULE_BASE_NAME)
        .into_iter()
        .find(|p| p.is_file())
}

#[test]
fn cross_module_call_reaches_the_entry_once() {
    let Some(module) = built_module() else {
        eprintln!(
            "skipping: {} not built next to the debuggee binary",
            module_file_name(MODULE_BASE_NAME)
        );
        return;
    };
    let out = debuggee_cmd(&["cross-module-call"])
        .env(SHAREDLIB_ENV, &module)
        .output()
        .expect("run debuggee");
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    assert_eq!(
        stdout.matches(debuggee2::ENTRY_BANNER).count(),
        1,
        "stdout:\n{stdout}"
    );
    assert!(stdout.starts_with("header_fn1(1)\nheader_fn2(2)\n"));
}

#[cfg(all(unix, any(target_arch = "x86_64", target_arch = "aarch64")))]
fn assert_killed_by_fault(out: &Output) {
    use std::os::unix::process::ExitStatusExt as _;
    let signal = out.status.signal();
    // macOS reports some null accesses as bus errors.
    let acceptable = |s: i32| s == libc::SIGSEGV || (cfg!(target_os = "macos") && s == libc::SIGBUS);
    assert!(
        signal.is_some_and(acceptable),
        "status {:?}, stderr:\n{}",
        out.status,
        stderr_of(out)
    );
}

#[cfg(all(unix, any(target_arch = "x86_64", target_arch = "aarch64")))]
#[test]
fn hardware_faults_terminate_with_a_signal() {
    for name in ["fault-address", "fault-call"] {
        let out = run_debuggee(&[name]);
        assert_killed_by_fault(&out);
        assert!(out.stdout.is_empty(), "{name}");
    }
}

#[test]
fn spawn_child_reports_the_child_pid() {
    let out = run_debuggee(&["spawn-child"]);
    assert_exit(&out, 0);
    let stdout = stdout_of(&out);
    let pid = stdout
        .lines()
        .find_map(|l| l.strip_prefix("pid = "))
        .expect("pid line");
    assert!(pid.parse::<u32>().is_ok(), "{stdout}");
}
