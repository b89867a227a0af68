//! Thread rendezvous: spawn workers, let them linger, join them in order.
//!
//! Each worker owns the cells in its own [`WorkerRecord`] and is the only writer
//! of them. The manager reads a record only after joining its worker, so plain
//! atomics with relaxed ordering are enough and no lock is taken.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Worker count used by both rendezvous scenarios.
pub const SCENARIO_WORKERS: u32 = 15;
pub const SCENARIO_LINGER: u32 = 1;
pub const SCENARIO_LONG_LINGER: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct RendezvousPlan {
    pub count: u32,
    /// Extra linger, in `unit`s, added to every worker's `id % 4`.
    pub linger: u32,
    pub unit: Duration,
    /// Manager pause between spawning the last worker and the first join.
    pub settle: Duration,
}

impl RendezvousPlan {
    pub fn seconds(count: u32, linger: u32) -> Self {
        RendezvousPlan {
            count,
            linger,
            unit: Duration::from_secs(1),
            settle: Duration::from_secs(1),
        }
    }

    pub fn linger_for(&self, id: u32) -> Duration {
        self.unit.saturating_mul((id % 4).saturating_add(self.linger))
    }
}

#[derive(Debug)]
pub struct WorkerRecord {
    pub id: u32,
    pub linger: Duration,
    alive: AtomicBool,
    started: AtomicBool,
}

impl WorkerRecord {
    fn new(id: u32, linger: Duration) -> Self {
        WorkerRecord {
            id,
            linger,
            alive: AtomicBool::new(false),
            started: AtomicBool::new(false),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    fn outcome(&self) -> WorkerOutcome {
        WorkerOutcome {
            id: self.id,
            started: self.started.load(Ordering::Relaxed),
            alive: self.alive.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub id: u32,
    pub started: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RendezvousReport {
    pub workers: Vec<WorkerOutcome>,
}

impl RendezvousReport {
    /// Every worker went alive and then back to not alive.
    pub fn all_completed(&self) -> bool {
        self.workers.iter().all(|w| w.started && !w.alive)
    }
}

pub fn run(count: u32, linger_seconds: u32) -> io::Result<RendezvousReport> {
    run_plan(&RendezvousPlan::seconds(count, linger_seconds))
}

/// Returns only after every spawned worker has been joined. If spawning fails
/// part way, the workers already running are still joined before the error is
/// returned.
pub fn run_plan(plan: &RendezvousPlan) -> io::Result<RendezvousReport> {
    let records: Vec<WorkerRecord> = (0..plan.count)
        .map(|id| WorkerRecord::new(id, plan.linger_for(id)))
        .collect();

    let workers = thread::scope(|scope| -> io::Result<Vec<WorkerOutcome>> {
        let mut handles = Vec::with_capacity(records.len());
        for record in &records {
            let handle = thread::Builder::new()
                .name(format!("debuggee-worker-{}", record.id))
                .spawn_scoped(scope, move || worker_main(record))?;
            handles.push((record, handle));
        }
        tracing::debug!(workers = handles.len(), "all workers spawned");

        thread::sleep(plan.settle);

        let mut outcomes = Vec::with_capacity(handles.len());
        for (record, handle) in handles {
            println!("Joining {}", record.id);
            if let Err(payload) = handle.join() {
                std::panic::resume_unwind(payload);
            }
            outcomes.push(record.outcome());
        }
        Ok(outcomes)
    })?;

    Ok(RendezvousReport { workers })
}

fn worker_main(record: &WorkerRecord) {
    record.alive.store(true, Ordering::Relaxed);
    record.started.store(true, Ordering::Relaxed);
    println!("I'm thread {}", record.id);
    thread::sleep(record.linger);
    println!("Thread {} exiting", record.id);
    record.alive.store(false, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fast_plan(count: u32, linger: u32) -> RendezvousPlan {
        RendezvousPlan {
            count,
            linger,
            unit: Duration::from_millis(5),
            settle: Duration::from_millis(10),
        }
    }

    #[test]
    fn zero_workers_returns_after_the_settle_delay() {
        let plan = fast_plan(0, 1);
        let start = Instant::now();
        let report = run_plan(&plan).unwrap();
        assert!(start.elapsed() >= plan.settle);
        assert!(report.workers.is_empty());
        assert!(report.all_completed());
    }

    #[test]
    fn every_worker_goes_alive_then_exits_before_return() {
        let plan = fast_plan(9, 1);
        let start = Instant::now();
        let report = run_plan(&plan).unwrap();

        let slowest = (0..plan.count).map(|id| plan.linger_for(id)).max().unwrap();
        assert!(start.elapsed() >= slowest);

        assert_eq!(report.workers.len(), 9);
        for (i, w) in report.workers.iter().enumerate() {
            assert_eq!(w.id, i as u32, "joined out of spawn order");
            assert!(w.started, "worker {} never went alive", w.id);
            assert!(!w.alive, "worker {} still alive after join", w.id);
        }
        assert!(report.all_completed());
    }

    #[test]
    fn linger_cycles_through_four_offsets() {
        let plan = RendezvousPlan::seconds(SCENARIO_WORKERS, SCENARIO_LINGER);
        let secs: Vec<u64> = (0..8).map(|id| plan.linger_for(id).as_secs()).collect();
        assert_eq!(secs, vec![1, 2, 3, 4, 1, 2, 3, 4]);

        let long = RendezvousPlan::seconds(SCENARIO_WORKERS, SCENARIO_LONG_LINGER);
        assert_eq!(long.linger_for(3).as_secs(), 10_003);
    }

    #[test]
    fn fresh_record_is_not_alive() {
        let record = WorkerRecord::new(3, Duration::ZERO);
        assert!(!record.is_alive());
        assert_eq!(
            record.outcome(),
            WorkerOutcome {
                id: 3,
                started: false,
                alive: false
            }
        );
    }
}
