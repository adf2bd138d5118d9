//! Fixed-size thread pool for severity-triggered side work
//!
//! Severe records are shipped to the remote backup endpoint off the producer
//! thread: the logger submits a task here and blocks on its [`TaskHandle`].
//! Tasks are type-erased nullary closures; a panic inside one is captured
//! into the handle and never unwinds a pool worker.

use super::error::{LoggerError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    jobs: VecDeque<Job>,
    stop: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    job_available: Condvar,
}

/// Awaitable result of a submitted task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task finishes. A task panic, or a pool torn down
    /// before the task ran, surfaces as [`LoggerError::TaskFailed`].
    pub fn join(self) -> Result<T> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(LoggerError::TaskFailed),
            Err(_) => Err(LoggerError::TaskFailed),
        }
    }
}

pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Start `thread_count` workers (at least one).
    pub fn new(thread_count: usize) -> Self {
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                jobs: VecDeque::new(),
                stop: false,
            }),
            job_available: Condvar::new(),
        });

        let workers = (0..thread_count.max(1))
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("fanlog-pool-{}", i))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn pool worker thread")
            })
            .collect();

        Self { shared, workers }
    }

    /// Queue `task` and return a handle for its result.
    ///
    /// Submissions are FIFO; with multiple workers, completion order is not.
    /// Fails with [`LoggerError::PoolClosed`] once the pool is shut down.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx): (Sender<thread::Result<T>>, _) = bounded(1);
        let job: Job = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(task));
            // The submitter may have dropped its handle; that is not an error.
            let _ = tx.send(outcome);
        });

        {
            let mut state = self.shared.state.lock();
            if state.stop {
                return Err(LoggerError::PoolClosed);
            }
            state.jobs.push_back(job);
        }
        self.shared.job_available.notify_one();
        Ok(TaskHandle { rx })
    }

    /// Refuse new submissions and let workers exit once the queue is
    /// drained. Threads are joined on drop; calling this twice is harmless.
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        state.stop = true;
        drop(state);
        self.shared.job_available.notify_all();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                eprintln!("[fanlog] pool worker panicked during shutdown");
            }
        }
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            while !state.stop && state.jobs.is_empty() {
                shared.job_available.wait(&mut state);
            }
            match state.jobs.pop_front() {
                Some(job) => job,
                // Stopped and drained.
                None => return,
            }
        };
        job();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_task_result_round_trip() {
        let pool = ThreadPool::new(2);
        let handle = pool.submit(|| 2 + 2).unwrap();
        assert_eq!(handle.join().unwrap(), 4);
    }

    #[test]
    fn test_every_accepted_task_runs() {
        let pool = ThreadPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 64);
    }

    #[test]
    fn test_submit_after_shutdown_is_refused() {
        let pool = ThreadPool::new(1);
        pool.shutdown();
        let err = pool.submit(|| ()).unwrap_err();
        assert!(matches!(err, LoggerError::PoolClosed));
    }

    #[test]
    fn test_panicking_task_reports_failure_not_poisoned_pool() {
        let pool = ThreadPool::new(1);
        let bad = pool.submit(|| panic!("task exploded")).unwrap();
        assert!(matches!(bad.join(), Err(LoggerError::TaskFailed)));

        // The worker that ran the panicking task is still alive.
        let good = pool.submit(|| "still here").unwrap();
        assert_eq!(good.join().unwrap(), "still here");
    }

    #[test]
    fn test_queued_tasks_drain_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new(1);
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(2));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_single_worker_runs_fifo() {
        let pool = ThreadPool::new(1);
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let order = Arc::clone(&order);
                pool.submit(move || order.lock().push(i)).unwrap()
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*order.lock(), (0..16).collect::<Vec<_>>());
    }
}
