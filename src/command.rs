use std::process::Command;
use std::process::ExitStatus;

use crate::errors::JobFailure;
use crate::outcome::JobOutcome;
use crate::traits::Job;
use crate::traits::JobContext;

/// a [Job] that runs one external command line synchronously on the
/// worker thread.
///
/// The job owns a copy of the command string: the worker thread reads it
/// asynchronously, so it must not reference caller-owned memory that
/// could be released in the meantime.
///
/// The command runs through the platform shell (`sh -c` on unix,
/// `cmd /C` on windows), matching `system()`-style semantics.  Exit
/// status 0 maps to outcome 0; any other exit maps to the negative
/// sentinel outcome carrying a [JobFailure] detail, reported from the
/// worker with a single error log line.  The launching thread only ever
/// learns of failure by inspecting the outcome.
///
/// ```no_run
/// use threadjob::CommandJob;
/// use threadjob::JobHandle;
///
/// # fn main() -> Result<(), threadjob::SpawnError> {
/// let handle = JobHandle::spawn(CommandJob::new("some_command --that --takes-a-while"))?;
/// while !handle.is_finished() {
///     // do progress display or whatever here...
///     std::thread::sleep(std::time::Duration::from_millis(50));
/// }
/// assert_eq!(0, handle.wait().code());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandJob {
    command: String,
}

impl CommandJob {
    /// creates a job that will run `command` through the platform shell.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// the owned command line.
    pub fn command(&self) -> &str {
        &self.command
    }

    #[cfg(unix)]
    fn shell_command(&self) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(&self.command);
        command
    }

    #[cfg(windows)]
    fn shell_command(&self) -> Command {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(&self.command);
        command
    }

    fn outcome_from_status(&self, ctx: &JobContext, status: ExitStatus) -> JobOutcome {
        match status.code() {
            Some(0) => JobOutcome::success(),
            Some(code) => {
                let failure = JobFailure::CommandStatus {
                    command: self.command.clone(),
                    code,
                };
                tracing::error!("job {}: {}", ctx.job_id(), failure);
                JobOutcome::failure(failure)
            }
            None => {
                let failure = JobFailure::CommandKilled {
                    command: self.command.clone(),
                };
                tracing::error!("job {}: {}", ctx.job_id(), failure);
                JobOutcome::failure(failure)
            }
        }
    }
}

impl Job for CommandJob {
    fn run(&self, ctx: &JobContext) -> JobOutcome {
        tracing::debug!("job {}: running command `{}`", ctx.job_id(), self.command);

        match self.shell_command().status() {
            Ok(status) => self.outcome_from_status(ctx, status),
            Err(e) => {
                let failure = JobFailure::CommandIo {
                    command: self.command.clone(),
                    source: e,
                };
                tracing::error!("job {}: {}", ctx.job_id(), failure);
                JobOutcome::failure(failure)
            }
        }
    }
}
