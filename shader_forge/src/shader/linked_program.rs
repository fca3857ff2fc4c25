/// LinkedProgram - program object handed to the caller

use crate::driver::ProgramHandle;
use crate::error::Error;
use crate::shader::BuildStatus;

/// Program object produced by `ShaderProgramBuilder::link` / `build`
///
/// The caller owns the driver object whether the program is Ready or Failed,
/// and gives it back with `ShaderProgramBuilder::destroy_program`.
#[derive(Debug)]
#[must_use = "a linked program holds a driver object; destroy it with ShaderProgramBuilder::destroy_program"]
pub struct LinkedProgram {
    handle: ProgramHandle,
    status: BuildStatus,
    failure: Option<Error>,
}

impl LinkedProgram {
    pub(crate) fn ready(handle: ProgramHandle) -> Self {
        Self { handle, status: BuildStatus::Ready, failure: None }
    }

    /// Driver link failed
    pub(crate) fn link_failed(handle: ProgramHandle, log: String) -> Self {
        Self {
            handle,
            status: BuildStatus::Failed(log.clone()),
            failure: Some(Error::LinkError { log }),
        }
    }

    /// Link skipped because a stage did not compile
    ///
    /// `log` describes every failed stage, `cause` is the first one's error.
    pub(crate) fn stage_failed(handle: ProgramHandle, log: String, cause: Error) -> Self {
        Self {
            handle,
            status: BuildStatus::Failed(log),
            failure: Some(cause),
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn status(&self) -> &BuildStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    /// Diagnostic log (`None` when Ready)
    pub fn log(&self) -> Option<&str> {
        self.status.log()
    }

    /// `Error::LinkError`, or the `Error::CompileError` of the first failed
    /// stage when the link was never attempted
    pub fn error(&self) -> Option<Error> {
        self.failure.clone()
    }
}
