/// Scope guard owning the intermediate stages of one `build` call

use crate::error::{Error, Result};
use crate::shader::{CompiledStage, LinkedProgram, ShaderProgramBuilder, ShaderSource, StageKind};

/// Releases every stage it holds when dropped, on success, early return or
/// unwind alike.
pub(crate) struct StageScope<'b, 'd> {
    builder: &'b mut ShaderProgramBuilder<'d>,
    vertex: Option<CompiledStage>,
    fragment: Option<CompiledStage>,
}

impl<'b, 'd> StageScope<'b, 'd> {
    pub(crate) fn new(builder: &'b mut ShaderProgramBuilder<'d>) -> Self {
        Self { builder, vertex: None, fragment: None }
    }

    /// Compile `source` into the slot for its kind, replacing (and releasing)
    /// any stage already there
    pub(crate) fn compile(&mut self, source: &ShaderSource) -> Result<()> {
        let stage = self.builder.compile_stage(source)?;
        let slot = match stage.kind() {
            StageKind::Vertex => &mut self.vertex,
            StageKind::Fragment => &mut self.fragment,
        };
        if let Some(previous) = slot.replace(stage) {
            self.builder.release_stage(previous);
        }
        Ok(())
    }

    /// Link the held stages (they stay owned by the scope)
    pub(crate) fn link(&mut self) -> Result<LinkedProgram> {
        match (&self.vertex, &self.fragment) {
            (Some(vertex), Some(fragment)) => self.builder.link(vertex, fragment),
            _ => Err(ShaderProgramBuilder::log_and_return_error(Error::InvalidResource(
                "both stages must be compiled before linking".to_string(),
            ))),
        }
    }
}

impl Drop for StageScope<'_, '_> {
    fn drop(&mut self) {
        for stage in [self.vertex.take(), self.fragment.take()].into_iter().flatten() {
            self.builder.release_stage(stage);
        }
    }
}

#[cfg(test)]
#[path = "stage_scope_tests.rs"]
mod tests;
