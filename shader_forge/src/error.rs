//! Error types for Shader Forge
//!
//! Compile and link failures are normally carried inside `CompiledStage` /
//! `LinkedProgram` as a status. They only become an `Error` when the caller
//! asks for one (`error()`, `build_checked`). Driver faults and API misuse
//! are always returned as `Err`.

use std::fmt;
use crate::shader::StageKind;

/// Result type for Shader Forge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shader Forge errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stage failed to compile
    CompileError {
        /// Stage that failed
        stage: StageKind,
        /// Driver diagnostic log
        log: String,
    },

    /// A program failed to link
    LinkError {
        /// Driver diagnostic log
        log: String,
    },

    /// Shader source is empty, unreadable, or of an unknown kind
    InvalidSource(String),

    /// Misuse of a stage or program (wrong kind, failed program bound, etc.)
    InvalidResource(String),

    /// Driver-level failure (object allocation, lost context, etc.)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CompileError { stage, log } => {
                write!(f, "{} shader compilation failed: {}", stage, log)
            }
            Error::LinkError { log } => write!(f, "Program linking failed: {}", log),
            Error::InvalidSource(msg) => write!(f, "Invalid shader source: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use shader_forge::forge_err;
/// let err = forge_err!("forge::gl", "glCreateShader failed: {}", "out of memory");
/// ```
#[macro_export]
macro_rules! forge_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::forge_error!($source, "{}", message);
        $crate::forge::Error::BackendError(message)
    }};
}

/// Log an error and return early with `Error::BackendError`
#[macro_export]
macro_rules! forge_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::forge_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
