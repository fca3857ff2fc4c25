/// Shader module - sources, build results and the program builder

pub mod shader_source;
pub mod build_status;
pub mod compiled_stage;
pub mod linked_program;
pub mod builder_config;
pub mod shader_program_builder;
mod stage_scope;

pub use shader_source::*;
pub use build_status::*;
pub use compiled_stage::*;
pub use linked_program::*;
pub use builder_config::*;
pub use shader_program_builder::*;
