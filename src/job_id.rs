/// A unique identifier for a [Job](crate::Job).
///
/// Used to correlate log lines emitted by the worker thread with the
/// handle that launched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId([u8; 8]);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl JobId {
    /// generates a random JobId
    pub(crate) fn random() -> Self {
        Self(rand::random())
    }
}
