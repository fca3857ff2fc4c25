/// CompiledStage - one compiled (or failed) shader stage object

use crate::driver::StageHandle;
use crate::error::Error;
use crate::shader::{BuildStatus, StageKind};

/// Driver stage object produced by `ShaderProgramBuilder::compile_stage`
///
/// Move-only: the only way to give the object back is
/// `ShaderProgramBuilder::release_stage`, which consumes it.
#[derive(Debug)]
#[must_use = "a compiled stage holds a driver object; release it with ShaderProgramBuilder::release_stage"]
pub struct CompiledStage {
    handle: StageHandle,
    kind: StageKind,
    label: String,
    status: BuildStatus,
}

impl CompiledStage {
    pub(crate) fn new(handle: StageHandle, kind: StageKind, label: String, status: BuildStatus) -> Self {
        Self { handle, kind, label, status }
    }

    pub fn handle(&self) -> StageHandle {
        self.handle
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Label of the source it was compiled from
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> &BuildStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    /// Compile log (`None` when Ready)
    pub fn log(&self) -> Option<&str> {
        self.status.log()
    }

    /// `Error::CompileError` for a Failed stage
    pub fn error(&self) -> Option<Error> {
        self.status.log().map(|log| Error::CompileError {
            stage: self.kind,
            log: log.to_string(),
        })
    }
}
