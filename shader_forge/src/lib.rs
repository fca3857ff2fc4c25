/*!
# Shader Forge

Builds GPU shader programs from a vertex/fragment source pair.

Compilation and linking go through the `ShaderDriver` trait so the same
builder runs against a real OpenGL context (`shader_forge_backend_gl`) or the
in-memory `MockDriver` used by tests.

## Architecture

- **ShaderProgramBuilder**: compiles stages, links programs, releases
  intermediate stage objects on every path
- **ShaderSource**: validated source text for one stage
- **CompiledStage / LinkedProgram**: move-only results carrying a
  Ready/Failed status and the driver diagnostics
- **ShaderDriver**: graphics driver capabilities (stage and program objects)
- **Forge**: replaceable process-wide logger
*/

// Internal modules
mod error;
mod facade;
pub mod log;
pub mod driver;
pub mod shader;

// Main forge namespace module
pub mod forge {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::facade::Forge;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, LogFacadeLogger, format_entry};
    }

    // Shader sources, results and builder
    pub mod shader {
        pub use crate::shader::*;
    }

    // Driver trait and mock driver
    pub mod driver {
        pub use crate::driver::*;
    }
}
