use crate::job_id::JobId;
use crate::outcome::JobOutcome;

/// per-job context handed to [Job::run] on the worker thread.
#[derive(Debug, Clone, Copy)]
pub struct JobContext {
    job_id: JobId,
}

impl JobContext {
    pub(crate) fn new(job_id: JobId) -> Self {
        Self { job_id }
    }

    /// the identifier of the job being run.
    pub fn job_id(&self) -> JobId {
        self.job_id
    }
}

/// a unit of deferred work that runs once on a dedicated worker thread.
///
/// A job's entry routine performs the work and yields a [JobOutcome].  It
/// executes on the worker thread, strictly after the startup handshake
/// has fired.  Failures must be expressed in the returned outcome; they
/// are never propagated into the launching thread's control flow.
///
/// Jobs are `Send + Sync` because the handle and the worker share them
/// across the thread boundary for the worker's whole lifetime.
pub trait Job: Send + Sync {
    /// performs the work of the job.
    fn run(&self, ctx: &JobContext) -> JobOutcome;
}

// so we can do eg:
//   JobHandle::spawn(job)
// instead of:
//   JobHandle::spawn(Box::new(job))
impl<T: Job + 'static> From<T> for Box<dyn Job> {
    fn from(job: T) -> Self {
        Box::new(job) as Box<dyn Job>
    }
}
