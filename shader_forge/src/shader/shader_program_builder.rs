/// ShaderProgramBuilder - compiles a vertex/fragment pair into a program
///
/// Compile and link failures come back as Failed `CompiledStage` /
/// `LinkedProgram` values carrying the driver log. `Err` is reserved for
/// driver faults and API misuse.

use crate::driver::{DriverStats, ShaderDriver};
use crate::error::{Error, Result};
use crate::shader::{
    BuildStatus, BuilderConfig, CompiledStage, LinkedProgram, ShaderSource, StageKind,
};
use crate::shader::stage_scope::StageScope;

const SOURCE: &str = "forge::ShaderProgramBuilder";

/// Result of `ShaderProgramBuilder::build_or_fallback`
#[derive(Debug)]
pub struct FallbackOutcome {
    /// Program built from whichever pair was used (check `is_ready()`)
    pub program: LinkedProgram,
    /// True if the primary pair failed and the fallback pair was built
    pub used_fallback: bool,
    /// Why the primary pair failed
    pub primary_error: Option<Error>,
}

/// Builds shader programs through a `ShaderDriver`
///
/// # Example
///
/// ```no_run
/// use shader_forge::forge::driver::MockDriver;
/// use shader_forge::forge::shader::{ShaderProgramBuilder, ShaderSource};
///
/// let mut driver = MockDriver::new();
/// let mut builder = ShaderProgramBuilder::new(&mut driver);
///
/// let vertex = ShaderSource::vertex("#version 330 core\nlayout(location=0) in vec3 aPos; void main(){gl_Position=vec4(aPos,1.0);}")?;
/// let fragment = ShaderSource::fragment("#version 330 core\nout vec4 FragColor; void main(){FragColor=vec4(1.0,0.5,0.2,1.0);}")?;
///
/// let program = builder.build(&vertex, &fragment)?;
/// if let Some(log) = program.log() {
///     eprintln!("{}", log);
/// }
/// builder.destroy_program(program);
/// # Ok::<(), shader_forge::forge::Error>(())
/// ```
pub struct ShaderProgramBuilder<'d> {
    driver: &'d mut dyn ShaderDriver,
    config: BuilderConfig,
}

impl<'d> ShaderProgramBuilder<'d> {
    /// Create a builder with `BuilderConfig::default()`
    pub fn new(driver: &'d mut dyn ShaderDriver) -> Self {
        Self::with_config(driver, BuilderConfig::default())
    }

    /// Create a builder with an explicit configuration
    pub fn with_config(driver: &'d mut dyn ShaderDriver, config: BuilderConfig) -> Self {
        Self { driver, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Lifetime counters of the underlying driver
    pub fn driver_stats(&self) -> DriverStats {
        self.driver.stats()
    }

    // ===== STEP-WISE API =====

    /// Compile one stage
    ///
    /// A compile failure is returned as a Failed stage, not as `Err`. The
    /// stage object stays alive until passed to `release_stage`.
    ///
    /// # Errors
    ///
    /// `Error::BackendError` if the driver cannot allocate the stage object.
    pub fn compile_stage(&mut self, source: &ShaderSource) -> Result<CompiledStage> {
        let kind = source.kind();
        let label = source.display_name();

        let handle = self.driver.create_shader_stage(kind)?;
        let text = self.config.prepare_source(source);
        self.driver.set_source(handle, &text);
        self.driver.compile(handle);

        let status = if self.driver.compile_status(handle) {
            if self.config.verbose {
                crate::forge_debug!(SOURCE, "Compiled {} stage '{}' ({})", kind, label, handle);
            }
            BuildStatus::Ready
        } else {
            let log = non_empty_log(
                self.driver.compile_log(handle),
                || format!("{} stage failed to compile ({} driver returned no log)", kind, self.driver.name()),
            );
            let log = self.config.truncate_log(log);
            crate::forge_warn!(SOURCE, "{} stage '{}' failed to compile:\n{}", kind, label, log.trim_end());
            BuildStatus::Failed(log)
        };

        Ok(CompiledStage::new(handle, kind, label, status))
    }

    /// Link a vertex stage and a fragment stage into a program
    ///
    /// Always allocates a program object, owned by the caller. If either
    /// stage is Failed the driver link is skipped and the program is Failed
    /// with a log naming every failed stage. The input stages are not
    /// released.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the stages are not (Vertex, Fragment),
    /// `Error::BackendError` if the driver cannot allocate the program.
    pub fn link(&mut self, vertex: &CompiledStage, fragment: &CompiledStage) -> Result<LinkedProgram> {
        if vertex.kind() != StageKind::Vertex || fragment.kind() != StageKind::Fragment {
            return Err(Self::log_and_return_error(Error::InvalidResource(format!(
                "link expects a Vertex and a Fragment stage, got {} and {}",
                vertex.kind(),
                fragment.kind()
            ))));
        }

        let program = self.driver.create_program()?;

        let failures: Vec<(&CompiledStage, Error)> = [vertex, fragment]
            .into_iter()
            .filter_map(|stage| stage.error().map(|error| (stage, error)))
            .collect();

        if let Some((_, cause)) = failures.first() {
            let log = failures
                .iter()
                .map(|(stage, _)| format!(
                    "{} stage '{}' failed to compile:\n{}",
                    stage.kind(),
                    stage.label(),
                    stage.log().unwrap_or_default().trim_end()
                ))
                .collect::<Vec<_>>()
                .join("\n");
            crate::forge_warn!(SOURCE, "Link of {} skipped: {} stage(s) failed to compile", program, failures.len());
            return Ok(LinkedProgram::stage_failed(program, log, cause.clone()));
        }

        self.driver.attach_stage(program, vertex.handle());
        self.driver.attach_stage(program, fragment.handle());
        self.driver.link_program(program);

        let linked = if self.driver.link_status(program) {
            crate::forge_info!(SOURCE, "Linked {} from '{}' and '{}'", program, vertex.label(), fragment.label());
            LinkedProgram::ready(program)
        } else {
            let log = non_empty_log(
                self.driver.link_log(program),
                || format!("program failed to link ({} driver returned no log)", self.driver.name()),
            );
            let log = self.config.truncate_log(log);
            crate::forge_warn!(SOURCE, "{} failed to link:\n{}", program, log.trim_end());
            LinkedProgram::link_failed(program, log)
        };

        if self.config.detach_after_link {
            self.driver.detach_stage(program, vertex.handle());
            self.driver.detach_stage(program, fragment.handle());
        }

        Ok(linked)
    }

    /// Delete a stage object
    pub fn release_stage(&mut self, stage: CompiledStage) {
        if self.config.verbose {
            crate::forge_debug!(SOURCE, "Releasing {} stage {}", stage.kind(), stage.handle());
        }
        self.driver.delete_shader_stage(stage.handle());
    }

    /// Delete a program object (Ready or Failed)
    pub fn destroy_program(&mut self, program: LinkedProgram) {
        if self.config.verbose {
            crate::forge_debug!(SOURCE, "Destroying {}", program.handle());
        }
        self.driver.delete_program(program.handle());
    }

    // ===== ONE-SHOT API =====

    /// Compile both stages and link them
    ///
    /// Both stages are compiled even if the vertex stage fails, so every
    /// diagnostic is reported in one pass. Intermediate stage objects are
    /// released on every exit path.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the sources are not (Vertex, Fragment),
    /// `Error::BackendError` on driver allocation failure.
    pub fn build(&mut self, vertex_source: &ShaderSource, fragment_source: &ShaderSource) -> Result<LinkedProgram> {
        Self::check_source_kind(vertex_source, StageKind::Vertex)?;
        Self::check_source_kind(fragment_source, StageKind::Fragment)?;

        let mut scope = StageScope::new(self);
        scope.compile(vertex_source)?;
        scope.compile(fragment_source)?;
        scope.link()
    }

    /// `build`, with a Failed program turned into `Err`
    ///
    /// The failed program object is destroyed before returning.
    ///
    /// # Errors
    ///
    /// `Error::CompileError` or `Error::LinkError` on build failure, plus the
    /// errors of `build`.
    pub fn build_checked(&mut self, vertex_source: &ShaderSource, fragment_source: &ShaderSource) -> Result<LinkedProgram> {
        let program = self.build(vertex_source, fragment_source)?;
        match program.error() {
            None => Ok(program),
            Some(error) => {
                self.destroy_program(program);
                Err(Self::log_and_return_error(error))
            }
        }
    }

    /// Build `primary`; if it fails, destroy it and build `fallback`
    ///
    /// Pairs are `(vertex, fragment)`. The fallback program may itself be
    /// Failed.
    pub fn build_or_fallback(
        &mut self,
        primary: (&ShaderSource, &ShaderSource),
        fallback: (&ShaderSource, &ShaderSource),
    ) -> Result<FallbackOutcome> {
        let program = self.build(primary.0, primary.1)?;
        let Some(primary_error) = program.error() else {
            return Ok(FallbackOutcome { program, used_fallback: false, primary_error: None });
        };

        self.destroy_program(program);
        crate::forge_warn!(SOURCE, "Primary shaders '{}' + '{}' failed, building fallback",
            primary.0.display_name(), primary.1.display_name());

        let program = self.build(fallback.0, fallback.1)?;
        Ok(FallbackOutcome { program, used_fallback: true, primary_error: Some(primary_error) })
    }

    // ===== BINDING =====

    /// Bind a Ready program for drawing
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the program is Failed; nothing is bound.
    pub fn use_program(&mut self, program: &LinkedProgram) -> Result<()> {
        if !program.is_ready() {
            return Err(Self::log_and_return_error(Error::InvalidResource(format!(
                "cannot bind {}: program is not ready",
                program.handle()
            ))));
        }
        self.driver.use_program(Some(program.handle()));
        Ok(())
    }

    /// Bind no program
    pub fn unbind_program(&mut self) {
        self.driver.use_program(None);
    }

    // ===== HELPERS =====

    fn check_source_kind(source: &ShaderSource, expected: StageKind) -> Result<()> {
        if source.kind() != expected {
            return Err(Self::log_and_return_error(Error::InvalidResource(format!(
                "expected a {} source, got {} source '{}'",
                expected,
                source.kind(),
                source.display_name()
            ))));
        }
        Ok(())
    }

    /// Log an error before returning it
    pub(crate) fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::CompileError { stage, .. } => {
                crate::forge_error!(SOURCE, "{} stage compilation failed", stage);
            }
            Error::LinkError { .. } => {
                crate::forge_error!(SOURCE, "Program linking failed");
            }
            _ => {
                crate::forge_error!(SOURCE, "{}", error);
            }
        }
        error
    }
}

/// Substitute a message when a driver reports failure with an empty log
fn non_empty_log(log: String, fallback: impl FnOnce() -> String) -> String {
    if log.trim().is_empty() {
        fallback()
    } else {
        log
    }
}

#[cfg(test)]
#[path = "shader_program_builder_tests.rs"]
mod tests;
