/// Result-with-status model shared by compiled stages and linked programs

/// Outcome of a compile or link step
///
/// Compile and link failures are data, not errors: the builder hands the
/// object back with `Failed(log)` and the caller decides what is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Driver reported success
    Ready,
    /// Driver reported failure, with its diagnostic log
    Failed(String),
}

impl BuildStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, BuildStatus::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }

    /// Diagnostic log (`None` when Ready)
    pub fn log(&self) -> Option<&str> {
        match self {
            BuildStatus::Ready => None,
            BuildStatus::Failed(log) => Some(log),
        }
    }
}
