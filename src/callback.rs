use crate::outcome::JobOutcome;
use crate::traits::Job;
use crate::traits::JobContext;

type CallbackFn = dyn Fn(&JobContext) -> i32 + Send + Sync;

/// a [Job] wrapping an arbitrary closure, so ad-hoc work can run on a
/// worker thread without defining a dedicated job type.
///
/// The closure receives the per-job [JobContext] and returns the integer
/// outcome code; anything else it needs travels in its captures.  A
/// callback-less job ([noop](Self::noop)) trivially succeeds with
/// outcome 0.
///
/// ```
/// use threadjob::CallbackJob;
/// use threadjob::JobHandle;
///
/// # fn main() -> Result<(), threadjob::SpawnError> {
/// let handle = JobHandle::spawn(CallbackJob::new(|_ctx| 21 + 21))?;
/// assert_eq!(42, handle.wait().code());
/// # Ok(())
/// # }
/// ```
pub struct CallbackJob {
    callback: Option<Box<CallbackFn>>,
}

impl std::fmt::Debug for CallbackJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackJob")
            .field("callback", &self.callback.as_ref().map(|_| "Fn"))
            .finish()
    }
}

impl CallbackJob {
    /// wraps `callback` as a job.
    pub fn new(callback: impl Fn(&JobContext) -> i32 + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// a job with no callback; it finishes immediately with outcome 0.
    pub fn noop() -> Self {
        Self { callback: None }
    }
}

impl Job for CallbackJob {
    fn run(&self, ctx: &JobContext) -> JobOutcome {
        match &self.callback {
            Some(callback) => JobOutcome::with_code(callback(ctx)),
            None => JobOutcome::success(),
        }
    }
}
