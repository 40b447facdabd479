//! Leaf counting for move generator verification
//!
//! [`perft_parallel()`] splits the work by root moves. Each worker takes the next root move from a
//! shared cursor, makes it on its own copy of the position and counts the subtree. If the deadline
//! expires before all subtrees are counted, the whole count fails.

use crate::moves::Move;
use crate::position::Position;

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

/// Counts leaf nodes at `depth` half-moves from `pos`
///
/// The position is modified during the walk and restored afterwards.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut res = 0;
    for mv in moves {
        let u = pos.make_move_raw(mv);
        res += perft(pos, depth - 1);
        pos.unmake_move(mv, u);
    }
    res
}

/// Like [`perft()`], but returns `None` as soon as `cancel` is raised
fn perft_cancellable(pos: &mut Position, depth: u32, cancel: &AtomicBool) -> Option<u64> {
    if depth <= 1 {
        return Some(perft(pos, depth));
    }
    if cancel.load(Ordering::Relaxed) {
        return None;
    }
    let mut res = 0;
    for mv in pos.legal_moves() {
        let u = pos.make_move_raw(mv);
        let sub = perft_cancellable(pos, depth - 1, cancel);
        pos.unmake_move(mv, u);
        res += sub?;
    }
    Some(res)
}

/// Leaf counts per root move, keyed by the move in UCI format
pub fn divide(pos: &Position, depth: u32) -> BTreeMap<String, u64> {
    let mut res = BTreeMap::new();
    if depth == 0 {
        return res;
    }
    for mv in pos.legal_moves() {
        let mut next = pos.make_move(mv);
        res.insert(mv.uci().to_string(), perft(&mut next, depth - 1));
    }
    res
}

/// Parameters for [`perft_parallel()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftConfig {
    /// Number of worker threads, zero means one
    pub threads: usize,
    /// Deadline for the whole count, a timeout too large for [`Instant`] means no deadline
    pub timeout: Duration,
}

impl Default for PerftConfig {
    fn default() -> Self {
        PerftConfig {
            threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    pub total: u64,
    /// Leaf counts per root move, as returned by [`divide()`]
    pub divide: BTreeMap<String, u64>,
    pub elapsed: Duration,
}

impl PerftReport {
    pub fn nodes_per_ms(&self) -> u64 {
        let ms = self.elapsed.as_millis().max(1);
        (self.total as u128 / ms) as u64
    }
}

#[derive(Debug, Error)]
pub enum PerftError {
    /// Not all the root moves were counted before the deadline
    #[error("perft timed out after {0:?}")]
    Timeout(Duration),
    #[error("perft worker panicked")]
    WorkerPanicked,
    #[error("cannot spawn perft worker: {0}")]
    Spawn(#[from] io::Error),
}

struct Shared {
    pos: Position,
    roots: Vec<Move>,
    depth: u32,
    cursor: AtomicUsize,
    cancel: AtomicBool,
}

fn worker(shared: Arc<Shared>, tx: Sender<(Move, u64)>) {
    loop {
        if shared.cancel.load(Ordering::Relaxed) {
            return;
        }
        let idx = shared.cursor.fetch_add(1, Ordering::Relaxed);
        let Some(&mv) = shared.roots.get(idx) else {
            return;
        };
        let mut next = shared.pos.make_move(mv);
        let Some(count) = perft_cancellable(&mut next, shared.depth - 1, &shared.cancel) else {
            return;
        };
        if tx.send((mv, count)).is_err() {
            return;
        }
    }
}

/// Counts leaf nodes at `depth` half-moves from `pos` using a pool of worker threads
///
/// Returns [`PerftError::Timeout`] if the count isn't finished within `config.timeout`. In this
/// case, the workers are cancelled and no partial result is reported.
pub fn perft_parallel(
    pos: &Position,
    depth: u32,
    config: &PerftConfig,
) -> Result<PerftReport, PerftError> {
    let start = Instant::now();
    if depth == 0 {
        return Ok(PerftReport {
            total: 1,
            divide: BTreeMap::new(),
            elapsed: start.elapsed(),
        });
    }

    let roots: Vec<Move> = pos.legal_moves().into_iter().collect();
    let expected = roots.len();
    let threads = config.threads.clamp(1, expected.max(1));
    info!(
        "perft depth {} with {} root moves on {} threads",
        depth, expected, threads
    );

    let shared = Arc::new(Shared {
        pos: *pos,
        roots,
        depth,
        cursor: AtomicUsize::new(0),
        cancel: AtomicBool::new(false),
    });
    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(threads);
    for i in 0..threads {
        let worker_shared = Arc::clone(&shared);
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("perft-{}", i))
            .spawn(move || worker(worker_shared, tx));
        match spawned {
            Ok(h) => handles.push(h),
            Err(e) => {
                warn!("cannot spawn perft worker {}: {}", i, e);
                cancel_workers(&shared);
                for h in handles {
                    let _ = h.join();
                }
                return Err(e.into());
            }
        }
    }
    drop(tx);

    // `None` if the timeout is too large to be represented, which means no deadline
    let deadline = start.checked_add(config.timeout);
    let mut divide = BTreeMap::new();
    let mut outcome = Ok(());
    while divide.len() < expected {
        let received = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((mv, count)) => {
                debug!("perft {}: {}", mv.uci(), count);
                divide.insert(mv.uci().to_string(), count);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "perft timed out after {:?} with {} of {} root moves counted",
                    config.timeout,
                    divide.len(),
                    expected
                );
                cancel_workers(&shared);
                outcome = Err(PerftError::Timeout(config.timeout));
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                outcome = Err(PerftError::WorkerPanicked);
                break;
            }
        }
    }

    let mut panicked = false;
    for h in handles {
        panicked |= h.join().is_err();
    }
    outcome?;
    if panicked {
        return Err(PerftError::WorkerPanicked);
    }

    let report = PerftReport {
        total: divide.values().sum(),
        divide,
        elapsed: start.elapsed(),
    };
    info!(
        "perft depth {}: {} nodes in {:?}",
        depth, report.total, report.elapsed
    );
    Ok(report)
}

fn cancel_workers(shared: &Shared) {
    shared.cancel.store(true, Ordering::Relaxed);
}
