//! Environment introspection scenarios.
//!
//! Output format is `NAME=VALUE`, one entry per line. Non-UTF-8 names or values
//! are printed lossily; comparisons are done on the raw OS strings.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

/// Print every inherited entry, in the order the process received them.
pub fn dump_all<W: Write>(out: &mut W) -> io::Result<usize> {
    dump_entries(std::env::vars_os(), out)
}

pub fn dump_entries<I, W>(entries: I, out: &mut W) -> io::Result<usize>
where
    I: IntoIterator<Item = (OsString, OsString)>,
    W: Write,
{
    let mut n = 0usize;
    for (name, value) in entries {
        writeln!(
            out,
            "{}={}",
            name.to_string_lossy(),
            value.to_string_lossy()
        )?;
        n += 1;
    }
    out.flush()?;
    Ok(n)
}

/// Split `NAME VALUE NAME VALUE ...` parameters into pairs. A trailing name
/// without a value is dropped.
pub fn pairs_from_params(params: &[String]) -> Vec<(&str, &str)> {
    params
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect()
}

/// Check every pair against the process environment.
pub fn check_all<W: Write>(pairs: &[(&str, &str)], out: &mut W) -> io::Result<bool> {
    check_all_with(pairs, |name| std::env::var_os(name), out)
}

/// Every pair is printed and checked, even after a mismatch. True only when at
/// least one pair was given and all of them matched.
pub fn check_all_with<W, F>(pairs: &[(&str, &str)], lookup: F, out: &mut W) -> io::Result<bool>
where
    W: Write,
    F: Fn(&str) -> Option<OsString>,
{
    let mut ok = !pairs.is_empty();
    for &(name, expected) in pairs {
        let actual = lookup(name);
        match &actual {
            Some(value) => writeln!(out, "{name}={}", value.to_string_lossy())?,
            None => writeln!(out, "{name}=(null)")?,
        }
        if actual.as_deref() != Some(OsStr::new(expected)) {
            tracing::debug!(name, expected, "environment mismatch");
            ok = false;
        }
    }
    out.flush()?;
    Ok(ok)
}
