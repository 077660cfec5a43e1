use std::any::Any;

/// a launch-time error: the worker thread could not be created.
///
/// This is the only failure that is surfaced synchronously to the
/// launching thread; everything that goes wrong after the worker has
/// started is contained in the worker and reported through the job's
/// [JobOutcome](crate::JobOutcome) instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpawnError {
    #[error("could not launch worker thread: {0}")]
    Launch(#[from] std::io::Error),
}

/// a run-time failure detail carried by a [JobOutcome](crate::JobOutcome).
///
/// Failures inside the worker never cross the thread boundary as errors;
/// they become a negative outcome code plus one of these, so the failure
/// is observable per-job even when nobody is watching the log stream.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum JobFailure {
    /// the external command ran and exited with a non-zero status.
    #[error("command `{command}` exited with status {code}")]
    CommandStatus { command: String, code: i32 },

    // note: on unix a missing exit code means the process ended because
    // of a signal, but that cannot be relied upon on windows.
    /// the external command terminated without an exit code.
    #[error("command `{command}` terminated without an exit code; possibly killed")]
    CommandKilled { command: String },

    /// the external command could not be run at all.
    #[error("command `{command}` could not be run: {source}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// the job's entry routine panicked; carries the panic message when
    /// one could be extracted.
    #[error("job panicked during processing{}", .0.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Panicked(Option<String>),
}

/// extracts the message from a panic payload, if it has a string form.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        Some((*s).to_string())
    } else {
        panic.downcast_ref::<String>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_from_static_str() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(Some("boom".to_string()), panic_message(payload.as_ref()));
    }

    #[test]
    fn panic_message_from_string() {
        let payload: Box<dyn Any + Send> = Box::new(format!("boom {}", 42));
        assert_eq!(Some("boom 42".to_string()), panic_message(payload.as_ref()));
    }

    #[test]
    fn panic_message_from_other_payload() {
        let payload: Box<dyn Any + Send> = Box::new(42u64);
        assert_eq!(None, panic_message(payload.as_ref()));
    }

    #[test]
    fn panicked_display_with_and_without_message() {
        assert_eq!(
            "job panicked during processing: boom",
            JobFailure::Panicked(Some("boom".to_string())).to_string()
        );
        assert_eq!(
            "job panicked during processing",
            JobFailure::Panicked(None).to_string()
        );
    }
}
