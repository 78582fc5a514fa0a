// src/parallel/mod.rs

//! Fixed-size worker-pool fan-out with submission-order results.
//!
//! Independent jobs are pulled from a shared queue by a fixed number of
//! worker threads; completion order is nondeterministic, so each job carries
//! its submission index and the results are re-sorted before returning.
//! Scoped threads keep borrowed job captures valid without `'static` bounds.

use std::collections::VecDeque;
use std::sync::{Mutex, mpsc};
use std::thread;

/// Runs `jobs` on at most `workers` threads and returns their outputs in
/// submission order.
///
/// The pool size is capped at the job count, so small batches never spawn
/// idle threads. Zero requested workers is treated as one. A panicking job
/// propagates out of the enclosing scope and panics the caller, the same
/// contract as running the job inline.
pub fn run_indexed<T, F>(jobs: Vec<F>, workers: usize) -> Vec<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    if jobs.is_empty() {
        return Vec::new();
    }
    let workers = workers.max(1).min(jobs.len());

    let queue: Mutex<VecDeque<(usize, F)>> =
        Mutex::new(jobs.into_iter().enumerate().collect());
    let (sender, receiver) = mpsc::channel::<(usize, T)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let queue = &queue;
            scope.spawn(move || {
                loop {
                    // A poisoned queue only happens if another job panicked,
                    // and that panic already dooms the whole scope.
                    let job = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    match job {
                        Some((index, job)) => {
                            if sender.send((index, job())).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            });
        }
        drop(sender);
    });

    let mut indexed: Vec<(usize, T)> = receiver.iter().collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, value)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn empty_job_list_returns_empty() {
        let jobs: Vec<Box<dyn FnOnce() -> u32 + Send>> = Vec::new();
        assert!(run_indexed(jobs, 4).is_empty());
    }

    #[test]
    fn results_come_back_in_submission_order() {
        // Reverse the sleep durations so completion order inverts
        // submission order.
        let jobs: Vec<_> = (0..8u64)
            .map(|i| {
                move || {
                    std::thread::sleep(Duration::from_millis((8 - i) * 3));
                    i * 10
                }
            })
            .collect();
        let results = run_indexed(jobs, 4);
        assert_eq!(results, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn worker_count_is_capped_at_job_count() {
        let live = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let jobs: Vec<_> = (0..2)
            .map(|i| {
                let live = &live;
                let peak = &peak;
                move || {
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    live.fetch_sub(1, Ordering::SeqCst);
                    i
                }
            })
            .collect();
        let results = run_indexed(jobs, 64);
        assert_eq!(results, vec![0, 1]);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn single_worker_still_processes_everything() {
        let jobs: Vec<_> = (0..5).map(|i| move || i * i).collect();
        assert_eq!(run_indexed(jobs, 1), vec![0, 1, 4, 9, 16]);
    }
}
