use super::search::{Frame, Objective, Search, SearchStatus, SolveResult};
use super::solver::Solver;
use super::state::Solution;
use crate::context::Context;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Shared coordination of a parallel search run.
struct Pool {
    /// Subtree frames waiting for a worker. Workers donate the bottom of
    /// their local stack here, so stolen work is a whole subtree and the
    /// thief keeps propagation locality over it.
    injector: Mutex<VecDeque<Frame>>,
    solutions: Mutex<Vec<Solution>>,
    emitted: AtomicUsize,
    active: AtomicUsize,
    nodes: AtomicU64,
    stop: AtomicBool,
    interrupted: Mutex<Option<SearchStatus>>,
}

impl Pool {
    fn interrupt(&self, status: SearchStatus) {
        let mut interrupted = self.interrupted.lock().unwrap();
        if interrupted.is_none() {
            *interrupted = Some(status);
        }
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// Work-stealing parallel search.
///
/// The root's value range is split over the workers as initial frames; each
/// worker runs its own depth-first stack and donates subtrees whenever the
/// injector runs dry. A shared counter cuts emission at the solution limit,
/// and an optimizing run shares its incumbent through the objective's
/// atomic, which the incumbent-bound propagator reads inside every worker.
pub(crate) fn solve(
    solver: &Solver,
    ctx: &Context,
    workers: usize,
    limit: usize,
    objective: Option<&Objective>,
) -> SolveResult {
    let root = match solver.propagate(ctx, &solver.model().initial_state()) {
        Ok(root) => root,
        Err(crate::error::Error::Cancelled) => {
            return SolveResult {
                solutions: vec![],
                status: SearchStatus::Cancelled,
            }
        }
        Err(_) => {
            return SolveResult {
                solutions: vec![],
                status: SearchStatus::Complete,
            }
        }
    };

    if root.is_solved() {
        let solution = root.solution().unwrap();
        if let Some(obj) = objective {
            obj.record(solution.value(obj.var));
        }
        return SolveResult {
            solutions: vec![solution],
            status: SearchStatus::Complete,
        };
    }

    // Split the first branching variable's values round-robin into one
    // frame per worker.
    let mut splitter = Search::new(solver, ctx, objective);
    let root_frame = splitter.frame(root).expect("unsolved root has a branch var");
    let mut chunks: Vec<VecDeque<isize>> = vec![VecDeque::new(); workers];
    for (i, value) in root_frame.values.iter().enumerate() {
        chunks[i % workers].push_back(*value);
    }
    let mut initial = VecDeque::new();
    for values in chunks.into_iter().filter(|c| !c.is_empty()) {
        initial.push_back(Frame {
            state: root_frame.state.clone(),
            var: root_frame.var,
            values,
        });
    }

    let pool = Pool {
        injector: Mutex::new(initial),
        solutions: Mutex::new(vec![]),
        emitted: AtomicUsize::new(0),
        active: AtomicUsize::new(0),
        nodes: AtomicU64::new(0),
        stop: AtomicBool::new(false),
        interrupted: Mutex::new(None),
    };

    thread::scope(|scope| {
        for worker in 0..workers {
            let pool = &pool;
            let ctx = ctx.clone();
            scope.spawn(move || {
                run_worker(solver, &ctx, pool, objective, limit, worker as u64)
            });
        }
    });

    let solutions = pool.solutions.into_inner().unwrap();
    let status = pool
        .interrupted
        .into_inner()
        .unwrap()
        .unwrap_or(SearchStatus::Complete);
    debug!(count = solutions.len(), ?status, "parallel search finished");
    SolveResult { solutions, status }
}

fn run_worker(
    solver: &Solver,
    ctx: &Context,
    pool: &Pool,
    objective: Option<&Objective>,
    limit: usize,
    salt: u64,
) {
    let mut search = Search::new(solver, ctx, objective);
    search.reseed(salt);
    let node_limit = solver.model().config().node_limit;

    loop {
        if pool.stop.load(Ordering::SeqCst) {
            return;
        }
        if ctx.is_cancelled() {
            pool.interrupt(SearchStatus::Cancelled);
            return;
        }

        // Popping and marking active happen under the same lock, so a frame
        // is always either queued or owned by an active worker.
        let frame = {
            let mut injector = pool.injector.lock().unwrap();
            let frame = injector.pop_front();
            if frame.is_some() {
                pool.active.fetch_add(1, Ordering::SeqCst);
            }
            frame
        };
        let frame = match frame {
            Some(frame) => frame,
            None => {
                if pool.active.load(Ordering::SeqCst) == 0 {
                    // No active workers means no more donations; empty +
                    // idle is stable and the run is over.
                    if pool.injector.lock().unwrap().is_empty() {
                        return;
                    }
                }
                thread::sleep(Duration::from_micros(100));
                continue;
            }
        };
        let mut frames = vec![frame];
        while !frames.is_empty() {
            if pool.stop.load(Ordering::SeqCst) {
                break;
            }
            pool.nodes.fetch_add(1, Ordering::Relaxed);
            if node_limit > 0 && pool.nodes.load(Ordering::Relaxed) > node_limit {
                pool.interrupt(SearchStatus::LimitReached);
                break;
            }

            donate(pool, &mut frames);

            let status = search.expand(&mut frames, &mut |solution| {
                if let Some(obj) = objective {
                    obj.record(solution.value(obj.var));
                }
                let emitted = pool.emitted.fetch_add(1, Ordering::SeqCst);
                if limit == 0 || emitted < limit {
                    pool.solutions.lock().unwrap().push(solution);
                }
                if limit > 0 && emitted + 1 >= limit {
                    pool.stop.store(true, Ordering::SeqCst);
                    false
                } else {
                    true
                }
            });
            match status {
                Some(SearchStatus::Cancelled) => {
                    pool.interrupt(SearchStatus::Cancelled);
                    break;
                }
                Some(SearchStatus::LimitReached) => {
                    pool.interrupt(SearchStatus::LimitReached);
                    break;
                }
                Some(SearchStatus::Complete) | None => {}
            }
        }
        pool.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Donate the remaining values of the oldest local frame when the injector
/// runs low; stolen frames are complete subtrees.
fn donate(pool: &Pool, frames: &mut Vec<Frame>) {
    if frames.len() < 2 {
        return;
    }
    let mut injector = pool.injector.lock().unwrap();
    if !injector.is_empty() {
        return;
    }
    let bottom = &mut frames[0];
    if bottom.values.is_empty() {
        return;
    }
    let values = std::mem::take(&mut bottom.values);
    injector.push_back(Frame {
        state: bottom.state.clone(),
        var: bottom.var,
        values,
    });
}
