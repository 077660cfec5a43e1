use std::sync::Arc;

use crate::errors::JobFailure;

/// the structured result of a finished job.
///
/// An outcome is the integer code the job's entry routine produced plus an
/// optional [JobFailure] detail.  `0` conventionally denotes success and
/// negative codes denote failure; [JobOutcome::FAILURE] is the sentinel
/// used when a failure carries no meaningful code of its own.
///
/// Outcomes are cheap to clone (the failure detail is behind an `Arc`) so
/// every observer of a multi-observer wait receives the same value.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    code: i32,
    failure: Option<Arc<JobFailure>>,
}

impl JobOutcome {
    /// the outcome code denoting success.
    pub const SUCCESS: i32 = 0;

    /// the sentinel outcome code for failures without a code of their own.
    pub const FAILURE: i32 = -1;

    /// a successful outcome with code 0.
    pub fn success() -> Self {
        Self::with_code(Self::SUCCESS)
    }

    /// an outcome with the given code and no failure detail.
    pub fn with_code(code: i32) -> Self {
        Self {
            code,
            failure: None,
        }
    }

    /// a failed outcome: the sentinel code plus the given detail.
    pub fn failure(failure: JobFailure) -> Self {
        Self::failure_with_code(Self::FAILURE, failure)
    }

    /// a failed outcome carrying a specific (negative) code.
    pub fn failure_with_code(code: i32, failure: JobFailure) -> Self {
        Self {
            code,
            failure: Some(Arc::new(failure)),
        }
    }

    /// the integer outcome code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// true if the code denotes success.
    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }

    /// the structured failure detail, if the job recorded one.
    pub fn failure_detail(&self) -> Option<&JobFailure> {
        self.failure.as_deref()
    }
}

impl From<i32> for JobOutcome {
    fn from(code: i32) -> Self {
        Self::with_code(code)
    }
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.failure {
            Some(failure) => write!(f, "{} ({})", self.code, failure),
            None => write!(f, "{}", self.code),
        }
    }
}
