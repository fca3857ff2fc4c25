/// ShaderDriver trait - the graphics driver capabilities the builder calls into

use std::fmt;
use crate::error::Result;
use crate::shader::StageKind;

/// Driver-side shader stage object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageHandle(pub u32);

/// Driver-side program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

impl fmt::Display for StageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage#{}", self.0)
    }
}

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

/// Counters kept by a driver over its lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Stage objects created
    pub stages_created: u32,
    /// Stage objects deleted
    pub stages_deleted: u32,
    /// Compile calls whose status was false
    pub compile_failures: u32,
    /// Program objects created
    pub programs_created: u32,
    /// Program objects deleted
    pub programs_deleted: u32,
    /// Link calls whose status was false
    pub link_failures: u32,
}

impl DriverStats {
    /// Stage objects currently alive
    pub fn live_stages(&self) -> u32 {
        self.stages_created.saturating_sub(self.stages_deleted)
    }

    /// Program objects currently alive
    pub fn live_programs(&self) -> u32 {
        self.programs_created.saturating_sub(self.programs_deleted)
    }
}

/// Graphics driver interface used by `ShaderProgramBuilder`
///
/// Mirrors the shader/program object model of OpenGL-style drivers: stage
/// objects are created, fed source, compiled and queried; program objects get
/// stages attached, are linked and queried. Every object created must be
/// deleted through the same driver.
///
/// Implementations are not required to be `Send`: a GL context belongs to the
/// thread that made it current.
pub trait ShaderDriver {
    /// Driver name used as log source suffix (e.g. "mock", "gl")
    fn name(&self) -> &str;

    // ===== STAGES =====

    /// Allocate a stage object of the given kind
    fn create_shader_stage(&mut self, kind: StageKind) -> Result<StageHandle>;

    /// Replace the source text of a stage
    fn set_source(&mut self, stage: StageHandle, text: &str);

    /// Compile the current source of a stage
    fn compile(&mut self, stage: StageHandle);

    /// Status of the last compile
    fn compile_status(&self, stage: StageHandle) -> bool;

    /// Diagnostic log of the last compile (may be empty on success)
    fn compile_log(&self, stage: StageHandle) -> String;

    /// Release a stage object
    fn delete_shader_stage(&mut self, stage: StageHandle);

    // ===== PROGRAMS =====

    /// Allocate a program object
    fn create_program(&mut self) -> Result<ProgramHandle>;

    /// Attach a stage to a program
    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle);

    /// Detach a stage from a program
    fn detach_stage(&mut self, program: ProgramHandle, stage: StageHandle);

    /// Link the attached stages
    fn link_program(&mut self, program: ProgramHandle);

    /// Status of the last link
    fn link_status(&self, program: ProgramHandle) -> bool;

    /// Diagnostic log of the last link (may be empty on success)
    fn link_log(&self, program: ProgramHandle) -> String;

    /// Release a program object
    fn delete_program(&mut self, program: ProgramHandle);

    /// Bind a program for drawing, or unbind with `None`
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Lifetime counters
    fn stats(&self) -> DriverStats;
}
