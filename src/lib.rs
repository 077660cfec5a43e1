//! This crate runs one unit of deferred work (a "job") on a dedicated
//! worker thread, with a startup handshake and a poll/wait completion
//! protocol.
//!
//! It is intentionally small: no thread pool, no work-stealing, no
//! cancellation, no multi-job scheduling.  One [JobHandle] owns one
//! worker thread running one [Job] to completion.
//!
//! The guarantees the handle gives you:
//!
//! 1. [JobHandle::spawn] blocks the launching thread until the worker has
//!    signalled its startup rendezvous.  When `spawn` returns, the worker
//!    is executing; there is no window in which you hold a handle to an
//!    unstarted worker.
//! 2. [JobHandle::is_finished] is a non-blocking poll, safe from any
//!    thread, monotone: once true it never reports false again.
//! 3. [JobHandle::wait] blocks until the job finishes; any number of
//!    concurrent observers unblock together and all see the identical
//!    [JobOutcome].
//! 4. Dropping a handle whose worker is still running blocks until the
//!    worker finishes and joins it.  The job is shared with the worker
//!    through an `Arc`, so it can never be torn down while the worker
//!    might still access it.
//!
//! Failures follow two tiers.  Failing to create the worker thread is
//! returned synchronously from `spawn` as a [SpawnError].  Anything that
//! goes wrong after that (a failing external command, a panic in the
//! entry routine) is contained in the worker and converted into a
//! negative outcome code carrying a structured [JobFailure] detail; it is
//! never re-raised into the launching thread's control flow.
//!
//! ## hello worker-thread world.
//!
//! Ad-hoc work goes in a [CallbackJob]; the closure's return value is the
//! job's outcome code.
//!
//! ```
//! use threadjob::CallbackJob;
//! use threadjob::JobHandle;
//!
//! # fn main() -> Result<(), threadjob::SpawnError> {
//! let handle = JobHandle::spawn(CallbackJob::new(|ctx| {
//!     println!("hello from job {}", ctx.job_id());
//!     0
//! }))?;
//!
//! let outcome = handle.wait();
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## driving a long-running external command.
//!
//! A [CommandJob] runs a command line through the platform shell on the
//! worker thread, leaving the launching thread free to render progress:
//!
//! ```no_run
//! use threadjob::CommandJob;
//! use threadjob::JobHandle;
//!
//! # fn main() -> Result<(), threadjob::SpawnError> {
//! let handle = JobHandle::spawn(CommandJob::new(
//!     "/path/to/some_command_that_will_take_a_while arguments...",
//! ))?;
//!
//! while !handle.is_finished() {
//!     // do progress display or whatever here...
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//!
//! match handle.wait().failure_detail() {
//!     None => println!("command succeeded"),
//!     Some(failure) => eprintln!("command failed: {failure}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## custom jobs.
//!
//! Implement [Job] for your own type when the work deserves a name:
//!
//! ```
//! use threadjob::Job;
//! use threadjob::JobContext;
//! use threadjob::JobHandle;
//! use threadjob::JobOutcome;
//!
//! #[derive(Debug)]
//! struct ChecksumJob {
//!     data: Vec<u8>,
//! }
//!
//! impl Job for ChecksumJob {
//!     fn run(&self, _ctx: &JobContext) -> JobOutcome {
//!         let sum = self.data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
//!         JobOutcome::with_code(sum as i32)
//!     }
//! }
//!
//! # fn main() -> Result<(), threadjob::SpawnError> {
//! let handle = JobHandle::spawn(ChecksumJob {
//!     data: vec![1, 2, 3],
//! })?;
//! assert_eq!(6, handle.wait().code());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod rendezvous;

mod callback;
mod command;
mod handle;
mod job_id;
mod outcome;
mod traits;

pub use callback::CallbackJob;
pub use command::CommandJob;
pub use errors::JobFailure;
pub use errors::SpawnError;
pub use handle::JobHandle;
pub use handle::WorkerSettings;
pub use job_id::JobId;
pub use outcome::JobOutcome;
pub use traits::Job;
pub use traits::JobContext;
