//! Terminal-output and busy-work scenarios. None of these need platform
//! fidelity; they give a debugger something specific to see on the console or
//! something to interrupt.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};

pub const SPAM_LINE: &str =
    "SPAM SPAM SPAM SPAM SPAM SPAM SPAM SPAM SPAM SPAM SPAM SPAM";
pub const SPAM_LINES: usize = 1000;

/// Print a counter once a second until the process is stopped from outside.
pub fn infinite_loop() -> ! {
    let mut i: u64 = 0;
    loop {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\r{i} ");
        let _ = stdout.flush();
        drop(stdout);
        std::thread::sleep(Duration::from_secs(1));
        i += 1;
    }
}

/// Prompt with `> `, echo each line back as `: <line>`, stop after an empty line
/// or at end of input. Returns the number of lines read.
pub fn echo_loop<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<usize> {
    let mut lines = 0usize;
    let mut line = String::new();
    loop {
        out.write_all(b"> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        lines += 1;
        out.write_all(b": ")?;
        out.write_all(line.as_bytes())?;
        out.flush()?;

        if line.trim_end_matches(['\r', '\n']).is_empty() {
            break;
        }
    }
    Ok(lines)
}

pub fn bulk_output<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    for _ in 0..lines {
        writeln!(out, "{SPAM_LINE}")?;
    }
    out.flush()
}

/// One line on each standard stream, stdout first, each flushed before the next.
pub fn stream_probe() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(b"stdout\n")?;
    stdout.flush()?;
    drop(stdout);

    let mut stderr = io::stderr().lock();
    stderr.write_all(b"stderr\n")?;
    stderr.flush()
}

pub fn path_edge_cases() {
    debuggee2::remote_path1();
    debuggee2::remote_path2();
    debuggee2::relative_path();
    debuggee2::denorm_path();
}

pub fn disassembly() {
    debuggee2::disassembly1();
}

#[derive(Debug, Clone, Copy)]
pub struct MandelbrotPlan {
    pub xdim: usize,
    pub ydim: usize,
    pub max_iter: u32,
}

impl Default for MandelbrotPlan {
    fn default() -> Self {
        MandelbrotPlan {
            xdim: 500,
            ydim: 500,
            max_iter: 100,
        }
    }
}

/// Escape iteration count for every pixel, row-major; `max_iter` means the point
/// did not escape.
pub fn mandelbrot_image(plan: &MandelbrotPlan) -> Vec<u32> {
    let mut image = vec![0u32; plan.xdim * plan.ydim];
    for y in 0..plan.ydim {
        for x in 0..plan.xdim {
            let cx = -2.05 + x as f32 * 3.0 / plan.xdim as f32;
            let cy = -1.5 + y as f32 * 3.0 / plan.ydim as f32;
            let (mut zx, mut zy) = (0.0f32, 0.0f32);
            let mut count = plan.max_iter;
            for i in 0..plan.max_iter {
                let next_x = zx * zx - zy * zy + cx;
                zy = 2.0 * zx * zy + cy;
                zx = next_x;
                if zx.hypot(zy) >= 2.0 {
                    count = i;
                    break;
                }
            }
            image[y * plan.xdim + x] = count;
        }
    }
    image
}

/// Render every 10th row and every 5th column as `#` (inside) or `.` (escaped).
pub fn mandelbrot<W: Write>(plan: &MandelbrotPlan, out: &mut W) -> io::Result<()> {
    let image = mandelbrot_image(plan);
    for y in (0..plan.ydim).step_by(10) {
        let row: String = (0..plan.xdim)
            .step_by(5)
            .map(|x| {
                if image[y * plan.xdim + x] < plan.max_iter {
                    '.'
                } else {
                    '#'
                }
            })
            .collect();
        writeln!(out, "{row}")?;
    }
    out.flush()
}

/// Re-run `exe` with the `sleep` scenario and wait for it, so a debugger can
/// follow (or not follow) the child.
pub fn spawn_child(exe: &Path) -> Result<()> {
    let mut child = Command::new(exe)
        .arg(debuggee_scenarios::ScenarioId::Sleep.as_str())
        .spawn()
        .with_context(|| format!("spawn child: {}", exe.display()))?;
    println!("pid = {}", child.id());
    let status = child
        .wait()
        .with_context(|| format!("wait for child {}", child.id()))?;
    tracing::debug!(%status, "child exited");
    Ok(())
}

pub fn sleep(duration: Duration) {
    std::thread::sleep(duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(input: &str) -> (usize, String) {
        let mut out = Vec::new();
        let n = echo_loop(&mut input.as_bytes(), &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn echo_stops_at_the_first_empty_line() {
        let (n, out) = echo("hello\nworld\n\nnever echoed\n");
        assert_eq!(n, 3);
        assert_eq!(out, "> : hello\n> : world\n> : \n");
    }

    #[test]
    fn echo_stops_at_end_of_input() {
        let (n, out) = echo("last line without newline");
        assert_eq!(n, 1);
        assert_eq!(out, "> : last line without newline> ");

        let (n, out) = echo("");
        assert_eq!(n, 0);
        assert_eq!(out, "> ");
    }

    #[test]
    fn bulk_output_writes_the_requested_line_count() {
        let mut out = Vec::new();
        bulk_output(&mut out, SPAM_LINES).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), SPAM_LINES);
        assert!(text.lines().all(|l| l == SPAM_LINE));
    }

    #[test]
    fn mandelbrot_classifies_known_points() {
        let plan = MandelbrotPlan {
            xdim: 60,
            ydim: 60,
            max_iter: 50,
        };
        let image = mandelbrot_image(&plan);
        assert_eq!(image.len(), 3600);
        // (-2.05, -1.5) is far outside the set.
        assert!(image[0] < plan.max_iter);
        // Column 41 / row 30 is roughly (0.0, 0.0), inside the set.
        assert_eq!(image[30 * plan.xdim + 41], plan.max_iter);
    }

    #[test]
    fn mandelbrot_dump_has_one_row_per_ten_lines() {
        let plan = MandelbrotPlan::default();
        let mut out = Vec::new();
        mandelbrot(&plan, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 50);
        assert!(rows.iter().all(|r| r.len() == 100));
        assert!(text.contains('#'));
        assert!(text.contains('.'));
    }
}
