/// Mock ShaderDriver for tests (no GPU required)
///
/// Keeps every stage and program object in memory, counts creations and
/// deletions, journals every call, and parses each source with naga through
/// `mock_glsl` so compile and link outcomes follow the source text.

use rustc_hash::FxHashMap;
use crate::driver::mock_glsl::{self, StageInterface};
use crate::driver::{DriverStats, ProgramHandle, ShaderDriver, StageHandle};
use crate::error::Result;
use crate::shader::StageKind;

const SOURCE: &str = "forge::mock";

#[derive(Debug)]
struct MockStage {
    kind: StageKind,
    source: String,
    compiled: bool,
    log: String,
    interface: Option<StageInterface>,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<StageHandle>,
    linked: bool,
    log: String,
}

/// In-memory driver with handle accounting and fault injection
#[derive(Debug)]
pub struct MockDriver {
    next_handle: u32,
    stages: FxHashMap<StageHandle, MockStage>,
    programs: FxHashMap<ProgramHandle, MockProgram>,
    bound_program: Option<ProgramHandle>,
    stats: DriverStats,
    invalid_calls: u32,
    calls: Vec<String>,
    stage_fault_in: Option<u32>,
    program_fault_in: Option<u32>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            stages: FxHashMap::default(),
            programs: FxHashMap::default(),
            bound_program: None,
            stats: DriverStats::default(),
            invalid_calls: 0,
            calls: Vec::new(),
            stage_fault_in: None,
            program_fault_in: None,
        }
    }

    // ===== FAULT INJECTION =====

    /// Make the next `create_shader_stage` call fail
    pub fn fail_next_stage_creation(&mut self) {
        self.fail_stage_creation_in(1);
    }

    /// Make the `calls`-th `create_shader_stage` call from now fail (1 = next)
    pub fn fail_stage_creation_in(&mut self, calls: u32) {
        self.stage_fault_in = Some(calls.max(1));
    }

    /// Make the next `create_program` call fail
    pub fn fail_next_program_creation(&mut self) {
        self.program_fault_in = Some(1);
    }

    // ===== INSPECTION =====

    /// Stage objects currently alive
    pub fn live_stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Program objects currently alive
    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    /// Calls made with a handle that does not exist (deleted or never created)
    pub fn invalid_call_count(&self) -> u32 {
        self.invalid_calls
    }

    /// Journal of every driver call, in order
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Currently bound program
    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound_program
    }

    /// Source text last set on a stage
    pub fn stage_source(&self, stage: StageHandle) -> Option<&str> {
        self.stages.get(&stage).map(|s| s.source.as_str())
    }

    /// True if `stage` is currently attached to `program`
    pub fn is_attached(&self, program: ProgramHandle, stage: StageHandle) -> bool {
        self.programs
            .get(&program)
            .is_some_and(|p| p.attached.contains(&stage))
    }

    /// True if the program exists and its last link succeeded
    pub fn is_linked(&self, program: ProgramHandle) -> bool {
        self.programs.get(&program).is_some_and(|p| p.linked)
    }

    fn fault_due(countdown: &mut Option<u32>) -> bool {
        match countdown {
            Some(1) => {
                *countdown = None;
                true
            }
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        }
    }

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn invalid(&mut self, call: &str, handle: impl std::fmt::Display) {
        self.invalid_calls += 1;
        self.calls.push(format!("invalid {}({})", call, handle));
        crate::forge_warn!(SOURCE, "{} called with unknown handle {}", call, handle);
    }

    fn link_stages(&self, program: &MockProgram) -> std::result::Result<(), String> {
        let mut vertex = None;
        let mut fragment = None;

        for handle in &program.attached {
            let Some(stage) = self.stages.get(handle) else {
                return Err(format!("error: attached {} no longer exists\n", handle));
            };
            if !stage.compiled {
                return Err("error: linking with uncompiled/unspecialized shader\n".to_string());
            }
            match stage.kind {
                StageKind::Vertex => vertex = stage.interface.as_ref(),
                StageKind::Fragment => fragment = stage.interface.as_ref(),
            }
        }

        match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => mock_glsl::check_interface(vertex, fragment),
            (None, _) => Err("error: program lacks a vertex shader\n".to_string()),
            (_, None) => Err("error: program lacks a fragment shader\n".to_string()),
        }
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderDriver for MockDriver {
    fn name(&self) -> &str {
        "mock"
    }

    fn create_shader_stage(&mut self, kind: StageKind) -> Result<StageHandle> {
        if Self::fault_due(&mut self.stage_fault_in) {
            self.calls.push(format!("create_shader_stage({}) failed", kind));
            crate::forge_bail!(SOURCE, "Injected failure creating {} stage", kind);
        }

        let handle = StageHandle(self.allocate());
        self.stages.insert(handle, MockStage {
            kind,
            source: String::new(),
            compiled: false,
            log: String::new(),
            interface: None,
        });
        self.stats.stages_created += 1;
        self.calls.push(format!("create_shader_stage({}) -> {}", kind, handle));
        Ok(handle)
    }

    fn set_source(&mut self, stage: StageHandle, text: &str) {
        match self.stages.get_mut(&stage) {
            Some(entry) => {
                entry.source = text.to_string();
                self.calls.push(format!("set_source({})", stage));
            }
            None => self.invalid("set_source", stage),
        }
    }

    fn compile(&mut self, stage: StageHandle) {
        let Some(entry) = self.stages.get_mut(&stage) else {
            self.invalid("compile", stage);
            return;
        };

        match mock_glsl::check_source(entry.kind, &entry.source) {
            Ok(interface) => {
                entry.compiled = true;
                entry.log.clear();
                entry.interface = Some(interface);
            }
            Err(log) => {
                entry.compiled = false;
                entry.log = log;
                entry.interface = None;
                self.stats.compile_failures += 1;
            }
        }
        self.calls.push(format!("compile({})", stage));
    }

    fn compile_status(&self, stage: StageHandle) -> bool {
        self.stages.get(&stage).is_some_and(|s| s.compiled)
    }

    fn compile_log(&self, stage: StageHandle) -> String {
        match self.stages.get(&stage) {
            Some(entry) => entry.log.clone(),
            None => format!("error: {} is not a shader object\n", stage),
        }
    }

    fn delete_shader_stage(&mut self, stage: StageHandle) {
        if self.stages.remove(&stage).is_none() {
            self.invalid("delete_shader_stage", stage);
            return;
        }
        for program in self.programs.values_mut() {
            program.attached.retain(|attached| *attached != stage);
        }
        self.stats.stages_deleted += 1;
        self.calls.push(format!("delete_shader_stage({})", stage));
    }

    fn create_program(&mut self) -> Result<ProgramHandle> {
        if Self::fault_due(&mut self.program_fault_in) {
            self.calls.push("create_program() failed".to_string());
            crate::forge_bail!(SOURCE, "Injected failure creating program");
        }

        let handle = ProgramHandle(self.allocate());
        self.programs.insert(handle, MockProgram::default());
        self.stats.programs_created += 1;
        self.calls.push(format!("create_program() -> {}", handle));
        Ok(handle)
    }

    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        if !self.stages.contains_key(&stage) {
            self.invalid("attach_stage", stage);
            return;
        }
        match self.programs.get_mut(&program) {
            Some(entry) => {
                if !entry.attached.contains(&stage) {
                    entry.attached.push(stage);
                }
                self.calls.push(format!("attach_stage({}, {})", program, stage));
            }
            None => self.invalid("attach_stage", program),
        }
    }

    fn detach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        match self.programs.get_mut(&program) {
            Some(entry) => {
                entry.attached.retain(|attached| *attached != stage);
                self.calls.push(format!("detach_stage({}, {})", program, stage));
            }
            None => self.invalid("detach_stage", program),
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        let Some(entry) = self.programs.get(&program) else {
            self.invalid("link_program", program);
            return;
        };

        let outcome = if entry.attached.is_empty() {
            Err("error: no shaders attached to the program\n".to_string())
        } else {
            self.link_stages(entry)
        };

        if outcome.is_err() {
            self.stats.link_failures += 1;
        }
        if let Some(entry) = self.programs.get_mut(&program) {
            match outcome {
                Ok(()) => {
                    entry.linked = true;
                    entry.log.clear();
                }
                Err(log) => {
                    entry.linked = false;
                    entry.log = log;
                }
            }
        }
        self.calls.push(format!("link_program({})", program));
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        self.is_linked(program)
    }

    fn link_log(&self, program: ProgramHandle) -> String {
        match self.programs.get(&program) {
            Some(entry) => entry.log.clone(),
            None => format!("error: {} is not a program object\n", program),
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program).is_none() {
            self.invalid("delete_program", program);
            return;
        }
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
        self.stats.programs_deleted += 1;
        self.calls.push(format!("delete_program({})", program));
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        match program {
            Some(handle) if !self.programs.contains_key(&handle) => self.invalid("use_program", handle),
            Some(handle) => {
                self.bound_program = Some(handle);
                self.calls.push(format!("use_program({})", handle));
            }
            None => {
                self.bound_program = None;
                self.calls.push("use_program(none)".to_string());
            }
        }
    }

    fn stats(&self) -> DriverStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "mock_driver_tests.rs"]
mod tests;
