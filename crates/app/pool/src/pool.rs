use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use futures::stream::FuturesUnordered;
use futures::StreamExt;

/// A unit of work delegated to the pool: a closure producing the future
/// that performs it. Boxed and type-erased so the channel can carry
/// arbitrarily different generation tasks.
pub type Task = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>> + Send>;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);
const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Betty's generation concurrency model: N OS threads
/// (`std::thread::available_parallelism`), each with its own
/// single-threaded Tokio runtime draining the same
/// [`crossbeam_channel`] queue and running up to `concurrency_per_thread`
/// tasks concurrently.
pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    worker_handles: Vec<JoinHandle<()>>,
    progress_handle: Option<JoinHandle<()>>,
    progress_stop: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    total: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    errors: Arc<Mutex<Vec<anyhow::Error>>>,
}

impl WorkerPool {
    /// Start the pool. `concurrency_per_thread` is how many tasks each OS
    /// thread's Tokio runtime runs concurrently (`K` in the two-level
    /// model); the number of OS threads is the host's available
    /// parallelism.
    #[must_use]
    pub fn start(concurrency_per_thread: usize) -> Self {
        Self::start_with_threads(
            thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
            concurrency_per_thread,
        )
    }

    /// Like [`WorkerPool::start`], but with an explicit OS thread count.
    /// Exposed for tests that want deterministic concurrency.
    #[must_use]
    pub fn start_with_threads(thread_count: usize, concurrency_per_thread: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Task>();
        let cancelled = Arc::new(AtomicBool::new(false));
        let total = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));

        let worker_handles = (0..thread_count.max(1))
            .map(|_| {
                let receiver = receiver.clone();
                let cancelled = cancelled.clone();
                let completed = completed.clone();
                let errors = errors.clone();
                thread::spawn(move || {
                    worker_loop(receiver, cancelled, completed, errors, concurrency_per_thread.max(1));
                })
            })
            .collect();

        let progress_stop = Arc::new(AtomicBool::new(false));
        let progress_handle = {
            let total = total.clone();
            let completed = completed.clone();
            let progress_stop = progress_stop.clone();
            thread::spawn(move || log_progress_forever(&total, &completed, &progress_stop))
        };

        Self {
            sender: Some(sender),
            worker_handles,
            progress_handle: Some(progress_handle),
            progress_stop,
            cancelled,
            total,
            completed,
            errors,
        }
    }

    /// Enqueue a task. Fails if the pool has already been joined.
    pub fn delegate(&self, task: Task) -> Result<(), anyhow::Error> {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.sender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("the worker pool has already been joined"))?
            .send(task)
            .map_err(|_| anyhow::anyhow!("the worker pool's threads have already stopped"))
    }

    /// Signal every worker thread to stop pulling new tasks once its
    /// current batch finishes, abandoning anything still queued.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Stop accepting new tasks, wait for every queued task to finish (or
    /// for cancellation to take effect), and return the first error any
    /// task produced, if any.
    pub fn join(mut self) -> Result<(), anyhow::Error> {
        self.sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
        self.progress_stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.progress_handle.take() {
            let _ = handle.join();
        }
        let mut errors = self.errors.lock().expect("pool error list mutex poisoned");
        match errors.drain(..).next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn worker_loop(
    receiver: Receiver<Task>,
    cancelled: Arc<AtomicBool>,
    completed: Arc<AtomicUsize>,
    errors: Arc<Mutex<Vec<anyhow::Error>>>,
    concurrency: usize,
) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to start a worker thread's Tokio runtime");

    runtime.block_on(async move {
        let mut in_flight = FuturesUnordered::new();
        loop {
            while in_flight.len() < concurrency && !cancelled.load(Ordering::Relaxed) {
                match receiver.try_recv() {
                    Ok(task) => in_flight.push(task()),
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }

            if in_flight.is_empty() {
                if cancelled.load(Ordering::Relaxed) || receiver.is_empty() && receiver_closed(&receiver)
                {
                    return;
                }
                thread::sleep(QUEUE_POLL_INTERVAL);
                continue;
            }

            if let Some(result) = in_flight.next().await {
                completed.fetch_add(1, Ordering::Relaxed);
                if let Err(error) = result {
                    cancelled.store(true, Ordering::Relaxed);
                    errors.lock().expect("pool error list mutex poisoned").push(error);
                }
            }
        }
    });
}

fn receiver_closed(receiver: &Receiver<Task>) -> bool {
    receiver.is_empty() && receiver.sender_count() == 0
}

/// Periodically report generation progress as a percentage. A pool with
/// zero delegated tasks is reported as 100% complete rather than
/// dividing by zero.
fn log_progress_forever(total: &Arc<AtomicUsize>, completed: &Arc<AtomicUsize>, stop: &Arc<AtomicBool>) {
    loop {
        for _ in 0..(PROGRESS_INTERVAL.as_millis() / SHUTDOWN_POLL_INTERVAL.as_millis()) {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            thread::sleep(SHUTDOWN_POLL_INTERVAL);
        }
        let total = total.load(Ordering::Relaxed);
        let completed = completed.load(Ordering::Relaxed);
        let percent = if total == 0 {
            100
        } else {
            (completed * 100 / total).min(100)
        };
        tracing::info!(percent, completed, total, "generation in progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;

    fn task(result: Result<(), anyhow::Error>) -> Task {
        Box::new(move || Box::pin(async move { result }))
    }

    #[test]
    fn runs_every_delegated_task() {
        let ran = Arc::new(StdAtomicUsize::new(0));
        let pool = WorkerPool::start_with_threads(2, 2);
        for _ in 0..10 {
            let ran = ran.clone();
            pool.delegate(Box::new(move || {
                Box::pin(async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }))
            .unwrap();
        }
        pool.join().unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn join_surfaces_the_first_task_error() {
        let pool = WorkerPool::start_with_threads(1, 1);
        pool.delegate(task(Err(anyhow::anyhow!("boom")))).unwrap();
        let result = pool.join();
        assert!(result.is_err());
    }

    #[test]
    fn a_task_error_cancels_remaining_queued_tasks() {
        let ran = Arc::new(StdAtomicUsize::new(0));
        let pool = WorkerPool::start_with_threads(1, 1);
        pool.delegate(task(Err(anyhow::anyhow!("boom")))).unwrap();
        for _ in 0..10 {
            let ran = ran.clone();
            pool.delegate(Box::new(move || {
                Box::pin(async move {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            }))
            .unwrap();
        }
        let result = pool.join();
        assert!(result.is_err());
        assert!(ran.load(Ordering::SeqCst) < 10);
    }

    #[test]
    fn total_and_completed_track_delegated_tasks() {
        let pool = WorkerPool::start_with_threads(1, 1);
        for _ in 0..3 {
            pool.delegate(task(Ok(()))).unwrap();
        }
        assert_eq!(pool.total(), 3);
        pool.join().unwrap();
    }
}
