/// GlDriver - ShaderDriver implementation over a glow OpenGL context

use glow::HasContext;
use rustc_hash::FxHashMap;
use shader_forge::forge::Result;
use shader_forge::forge::driver::{DriverStats, ProgramHandle, ShaderDriver, StageHandle};
use shader_forge::forge::shader::StageKind;
use shader_forge::{forge_err, forge_warn};

const SOURCE: &str = "forge::gl";

/// GL shader type for a stage kind
pub fn stage_kind_to_gl(kind: StageKind) -> u32 {
    match kind {
        StageKind::Vertex => glow::VERTEX_SHADER,
        StageKind::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// OpenGL shader driver
///
/// Maps our stage and program handles to glow's native objects. Objects
/// still alive when the driver is dropped are deleted then.
pub struct GlDriver {
    /// GL function table
    gl: glow::Context,
    /// Live shader objects
    stages: FxHashMap<StageHandle, glow::Shader>,
    /// Live program objects
    programs: FxHashMap<ProgramHandle, glow::Program>,
    next_handle: u32,
    stats: DriverStats,
}

impl GlDriver {
    /// Wrap a GL context
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for the whole lifetime of
    /// the driver, and the driver must only be used from that thread.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            stages: FxHashMap::default(),
            programs: FxHashMap::default(),
            next_handle: 1,
            stats: DriverStats::default(),
        }
    }

    /// Underlying context (vertex buffers, draw calls, uniforms)
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Native program object behind a handle
    pub fn native_program(&self, program: ProgramHandle) -> Option<glow::Program> {
        self.programs.get(&program).copied()
    }

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn shader(&self, stage: StageHandle, call: &str) -> Option<glow::Shader> {
        let shader = self.stages.get(&stage).copied();
        if shader.is_none() {
            forge_warn!(SOURCE, "{} called with unknown {}", call, stage);
        }
        shader
    }

    fn program(&self, program: ProgramHandle, call: &str) -> Option<glow::Program> {
        let native = self.programs.get(&program).copied();
        if native.is_none() {
            forge_warn!(SOURCE, "{} called with unknown {}", call, program);
        }
        native
    }
}

impl ShaderDriver for GlDriver {
    fn name(&self) -> &str {
        "gl"
    }

    // ===== STAGES =====

    fn create_shader_stage(&mut self, kind: StageKind) -> Result<StageHandle> {
        let shader = unsafe { self.gl.create_shader(stage_kind_to_gl(kind)) }
            .map_err(|e| forge_err!(SOURCE, "Failed to create {} shader: {}", kind, e))?;

        let handle = StageHandle(self.allocate());
        self.stages.insert(handle, shader);
        self.stats.stages_created += 1;
        Ok(handle)
    }

    fn set_source(&mut self, stage: StageHandle, text: &str) {
        if let Some(shader) = self.shader(stage, "set_source") {
            unsafe { self.gl.shader_source(shader, text) };
        }
    }

    fn compile(&mut self, stage: StageHandle) {
        if let Some(shader) = self.shader(stage, "compile") {
            let compiled = unsafe {
                self.gl.compile_shader(shader);
                self.gl.get_shader_compile_status(shader)
            };
            if !compiled {
                self.stats.compile_failures += 1;
            }
        }
    }

    fn compile_status(&self, stage: StageHandle) -> bool {
        self.stages
            .get(&stage)
            .is_some_and(|shader| unsafe { self.gl.get_shader_compile_status(*shader) })
    }

    fn compile_log(&self, stage: StageHandle) -> String {
        match self.stages.get(&stage) {
            Some(shader) => unsafe { self.gl.get_shader_info_log(*shader) },
            None => format!("{} is not a shader object", stage),
        }
    }

    fn delete_shader_stage(&mut self, stage: StageHandle) {
        match self.stages.remove(&stage) {
            Some(shader) => {
                unsafe { self.gl.delete_shader(shader) };
                self.stats.stages_deleted += 1;
            }
            None => forge_warn!(SOURCE, "delete_shader_stage called with unknown {}", stage),
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self) -> Result<ProgramHandle> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| forge_err!(SOURCE, "Failed to create program: {}", e))?;

        let handle = ProgramHandle(self.allocate());
        self.programs.insert(handle, program);
        self.stats.programs_created += 1;
        Ok(handle)
    }

    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        if let (Some(native), Some(shader)) = (self.program(program, "attach_stage"), self.shader(stage, "attach_stage")) {
            unsafe { self.gl.attach_shader(native, shader) };
        }
    }

    fn detach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        if let (Some(native), Some(shader)) = (self.program(program, "detach_stage"), self.shader(stage, "detach_stage")) {
            unsafe { self.gl.detach_shader(native, shader) };
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        if let Some(native) = self.program(program, "link_program") {
            let linked = unsafe {
                self.gl.link_program(native);
                self.gl.get_program_link_status(native)
            };
            if !linked {
                self.stats.link_failures += 1;
            }
        }
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        self.programs
            .get(&program)
            .is_some_and(|native| unsafe { self.gl.get_program_link_status(*native) })
    }

    fn link_log(&self, program: ProgramHandle) -> String {
        match self.programs.get(&program) {
            Some(native) => unsafe { self.gl.get_program_info_log(*native) },
            None => format!("{} is not a program object", program),
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        match self.programs.remove(&program) {
            Some(native) => {
                unsafe { self.gl.delete_program(native) };
                self.stats.programs_deleted += 1;
            }
            None => forge_warn!(SOURCE, "delete_program called with unknown {}", program),
        }
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        match program {
            Some(handle) => {
                if let Some(native) = self.program(handle, "use_program") {
                    unsafe { self.gl.use_program(Some(native)) };
                }
            }
            None => unsafe { self.gl.use_program(None) },
        }
    }

    fn stats(&self) -> DriverStats {
        self.stats
    }
}

impl Drop for GlDriver {
    fn drop(&mut self) {
        if !self.stages.is_empty() || !self.programs.is_empty() {
            forge_warn!(
                SOURCE,
                "Dropping GlDriver with {} stage(s) and {} program(s) still alive",
                self.stages.len(),
                self.programs.len()
            );
        }
        unsafe {
            for (_, shader) in self.stages.drain() {
                self.gl.delete_shader(shader);
            }
            for (_, program) in self.programs.drain() {
                self.gl.delete_program(program);
            }
        }
    }
}

#[cfg(test)]
#[path = "gl_driver_tests.rs"]
mod tests;
