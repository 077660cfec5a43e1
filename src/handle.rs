use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::errors::panic_message;
use crate::errors::JobFailure;
use crate::errors::SpawnError;
use crate::job_id::JobId;
use crate::outcome::JobOutcome;
use crate::rendezvous;
use crate::traits::Job;
use crate::traits::JobContext;

/// configuration for the worker thread backing one job.
///
/// The default spawns an anonymous worker with the platform's default
/// stack size.
#[derive(Debug, Clone, Default)]
pub struct WorkerSettings {
    thread_name: Option<String>,
    stack_size: Option<usize>,
}

impl WorkerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// names the worker thread, so it shows up in debuggers and panics.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// sets the worker thread's stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// completion state shared between the launcher and the worker.
///
/// This is the only mutable state that crosses the thread boundary.  The
/// worker writes it exactly once, on completion; the launcher and any
/// other observers read it arbitrarily often.
#[derive(Debug)]
struct JobStatus {
    outcome: Mutex<Option<JobOutcome>>,
    finished_cond: Condvar,
    finished: AtomicBool,
}

impl JobStatus {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            finished_cond: Condvar::new(),
            finished: AtomicBool::new(false),
        }
    }

    // worker side: records the outcome exactly once and wakes all waiters.
    fn finish(&self, outcome: JobOutcome) {
        let mut guard = self.outcome.lock().unwrap();
        debug_assert!(guard.is_none());
        *guard = Some(outcome);
        // Release pairs with the Acquire in is_finished(): the flag flips
        // only after the outcome is in place.
        self.finished.store(true, Ordering::Release);
        drop(guard);
        self.finished_cond.notify_all();
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn wait(&self) -> JobOutcome {
        let mut guard = self.outcome.lock().unwrap();
        loop {
            if let Some(outcome) = guard.as_ref() {
                return outcome.clone();
            }
            guard = self.finished_cond.wait(guard).unwrap();
        }
    }

    fn outcome(&self) -> Option<JobOutcome> {
        self.outcome.lock().unwrap().clone()
    }
}

/// the caller-owned representation of one worker thread running one [Job].
///
/// `spawn` starts the worker and blocks the launching thread on the
/// startup handshake, so once a handle exists its worker is executing.
/// The handle then exposes a non-blocking completion poll
/// ([is_finished](Self::is_finished)), a blocking wait
/// ([wait](Self::wait)) and the recorded [JobOutcome].
///
/// A handle never abandons a running worker: dropping it blocks until the
/// worker has finished and joins the thread.  The job itself is shared
/// with the worker through an `Arc`, so it cannot be torn down while the
/// worker might still access it.
pub struct JobHandle {
    job: Arc<dyn Job>,
    job_id: JobId,
    status: Arc<JobStatus>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("job", &"Arc<dyn Job>")
            .field("job_id", &self.job_id)
            .field("status", &self.status)
            .field("thread", &self.thread)
            .finish()
    }
}

impl JobHandle {
    /// spawns a dedicated worker thread for `job`.
    ///
    /// Blocks the calling thread until the worker has signalled the
    /// startup handshake, then returns the handle.  Failure to create the
    /// thread (e.g. resource exhaustion) is returned synchronously as a
    /// [SpawnError].
    pub fn spawn(job: impl Into<Box<dyn Job>>) -> Result<Self, SpawnError> {
        Self::spawn_with(job, WorkerSettings::default())
    }

    /// like [spawn](Self::spawn), with explicit [WorkerSettings].
    pub fn spawn_with(
        job: impl Into<Box<dyn Job>>,
        settings: WorkerSettings,
    ) -> Result<Self, SpawnError> {
        let job: Arc<dyn Job> = Arc::from(job.into());
        let job_id = JobId::random();
        let status = Arc::new(JobStatus::new());
        let ctx = JobContext::new(job_id);

        let mut builder = thread::Builder::new();
        if let Some(name) = &settings.thread_name {
            builder = builder.name(name.clone());
        }
        if let Some(bytes) = settings.stack_size {
            builder = builder.stack_size(bytes);
        }

        let (signal, started) = rendezvous::pair();
        let worker_job = job.clone();
        let worker_status = status.clone();
        let thread = builder.spawn(move || {
            // the handshake is the first action of the entry routine,
            // before any job-specific work.
            signal.signal();
            worker(worker_job, worker_status, ctx);
        })?;

        // once this returns the worker is provably executing; there is no
        // window where the caller holds an unstarted handle.
        started.wait();

        tracing::debug!("JobHandle: spawned worker for job {}", job_id);

        Ok(Self {
            job,
            job_id,
            status,
            thread: Some(thread),
        })
    }

    /// the identifier of the job this handle owns.
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// the job this handle owns.
    pub fn job(&self) -> &Arc<dyn Job> {
        &self.job
    }

    /// non-blocking completion poll.
    ///
    /// Safe to call arbitrarily often from any thread.  Once it has
    /// returned true it never reports false again.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// blocks until the job has finished and returns its outcome.
    ///
    /// May be called concurrently by any number of observers; all of them
    /// observe the identical outcome and all unblock once the worker
    /// finishes.
    pub fn wait(&self) -> JobOutcome {
        self.status.wait()
    }

    /// the recorded outcome, or `None` while the job is still running.
    pub fn outcome(&self) -> Option<JobOutcome> {
        self.status.outcome()
    }

    /// blocks until the job has finished, joins the worker thread and
    /// returns the outcome.
    pub fn join(mut self) -> JobOutcome {
        self.join_thread();
        // the worker records its outcome before exiting, so after the
        // join it is always present.
        self.status.wait()
    }

    fn join_thread(&mut self) {
        if let Some(thread) = self.thread.take() {
            // the worker contains panics from Job::run itself, so a join
            // error means something outside the entry routine unwound.
            if thread.join().is_err() {
                tracing::error!(
                    "worker thread for job {} terminated abnormally",
                    self.job_id
                );
            }
        }
    }
}

impl Drop for JobHandle {
    // an unjoined, still-running worker must never be torn down; the drop
    // blocks until the worker has finished, like an implicit join().
    fn drop(&mut self) {
        if self.thread.is_some() {
            tracing::debug!("JobHandle: dropping; joining worker for job {}", self.job_id);
        }
        self.join_thread();
    }
}

/// the worker thread's entry routine, minus the handshake that precedes it.
fn worker(job: Arc<dyn Job>, status: Arc<JobStatus>, ctx: JobContext) {
    let job_id = ctx.job_id();

    tracing::debug!("job {}: worker running", job_id);
    let timer = Instant::now();

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| job.run(&ctx))) {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            match &message {
                Some(m) => tracing::error!("job {}: panicked during processing: {}", job_id, m),
                None => tracing::error!("job {}: panicked during processing", job_id),
            }
            JobOutcome::failure(JobFailure::Panicked(message))
        }
    };

    tracing::debug!(
        "job {}: finished - outcome: {} - {} secs",
        job_id,
        outcome,
        timer.elapsed().as_secs_f32()
    );

    status.finish(outcome);
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    use tracing_test::traced_test;

    use super::*;
    use crate::callback::CallbackJob;

    // a job that spins until released, then returns a fixed code.
    #[derive(Debug)]
    struct GatedJob {
        release: Arc<AtomicBool>,
        code: i32,
    }

    impl GatedJob {
        fn new(code: i32) -> (Self, Arc<AtomicBool>) {
            let release = Arc::new(AtomicBool::new(false));
            (
                Self {
                    release: release.clone(),
                    code,
                },
                release,
            )
        }
    }

    impl Job for GatedJob {
        fn run(&self, _ctx: &JobContext) -> JobOutcome {
            while !self.release.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
            JobOutcome::with_code(self.code)
        }
    }

    struct PanicJob;

    impl Job for PanicJob {
        fn run(&self, _ctx: &JobContext) -> JobOutcome {
            panic!("entry routine exploded");
        }
    }

    #[test]
    fn wait_returns_the_job_outcome() -> anyhow::Result<()> {
        let handle = JobHandle::spawn(CallbackJob::new(|_| 42))?;
        assert_eq!(42, handle.wait().code());
        Ok(())
    }

    #[test]
    fn is_finished_is_false_until_the_entry_routine_returns() -> anyhow::Result<()> {
        let (job, release) = GatedJob::new(7);
        let handle = JobHandle::spawn(job)?;

        // the worker is running but gated: not finished, no outcome.
        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());
        assert!(handle.outcome().is_none());

        release.store(true, Ordering::SeqCst);
        assert_eq!(7, handle.wait().code());

        // once true, stays true.
        for _ in 0..100 {
            assert!(handle.is_finished());
        }
        assert_eq!(7, handle.outcome().unwrap().code());
        Ok(())
    }

    #[test]
    fn concurrent_waiters_all_observe_the_same_outcome() -> anyhow::Result<()> {
        let (job, release) = GatedJob::new(7);
        let handle = JobHandle::spawn(job)?;

        thread::scope(|s| {
            let observers: Vec<_> = (0..4).map(|_| s.spawn(|| handle.wait().code())).collect();

            release.store(true, Ordering::SeqCst);
            for observer in observers {
                assert_eq!(7, observer.join().unwrap());
            }
        });
        Ok(())
    }

    #[test]
    fn drop_joins_a_still_running_worker() -> anyhow::Result<()> {
        let completed = Arc::new(AtomicBool::new(false));

        let worker_completed = completed.clone();
        let handle = JobHandle::spawn(CallbackJob::new(move |_| {
            thread::sleep(Duration::from_millis(50));
            worker_completed.store(true, Ordering::SeqCst);
            0
        }))?;

        // drop must block until the worker has finished; only then is it
        // safe for the job to go away.
        drop(handle);
        assert!(completed.load(Ordering::SeqCst));
        Ok(())
    }

    #[test]
    fn join_returns_outcome_after_joining_the_thread() -> anyhow::Result<()> {
        let handle = JobHandle::spawn(CallbackJob::new(|_| 3))?;
        assert_eq!(3, handle.join().code());
        Ok(())
    }

    #[test]
    #[traced_test]
    fn panicking_job_is_contained_in_the_worker() -> anyhow::Result<()> {
        let handle = JobHandle::spawn(PanicJob)?;

        let outcome = handle.wait();
        assert_eq!(JobOutcome::FAILURE, outcome.code());
        assert!(matches!(
            outcome.failure_detail(),
            Some(JobFailure::Panicked(Some(m))) if m == "entry routine exploded"
        ));
        Ok(())
    }

    #[test]
    fn worker_thread_carries_the_configured_name() -> anyhow::Result<()> {
        let handle = JobHandle::spawn_with(
            CallbackJob::new(|_| {
                if thread::current().name() == Some("gadget-worker") {
                    0
                } else {
                    -1
                }
            }),
            WorkerSettings::new()
                .with_thread_name("gadget-worker")
                .with_stack_size(512 * 1024),
        )?;
        assert_eq!(0, handle.wait().code());
        Ok(())
    }

    #[test]
    fn handles_are_usable_from_other_threads() -> anyhow::Result<()> {
        let handle = Arc::new(JobHandle::spawn(CallbackJob::new(|_| 9))?);

        let shared = handle.clone();
        let observer = thread::spawn(move || shared.wait().code());
        assert_eq!(9, observer.join().unwrap());
        assert_eq!(9, handle.wait().code());
        Ok(())
    }

    // repeated spawns exercise the handshake path; each job increments the
    // counter as its first action only after the launcher has already been
    // released by the rendezvous, so the counts stay in lockstep.
    #[test]
    fn spawn_returns_only_after_the_worker_started() -> anyhow::Result<()> {
        let runs = Arc::new(AtomicU32::new(0));

        for _ in 0..50 {
            let worker_runs = runs.clone();
            let handle = JobHandle::spawn(CallbackJob::new(move |_| {
                worker_runs.fetch_add(1, Ordering::SeqCst);
                0
            }))?;
            handle.join();
        }

        assert_eq!(50, runs.load(Ordering::SeqCst));
        Ok(())
    }
}
