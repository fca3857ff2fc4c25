/*!
# Shader Forge - OpenGL Backend

OpenGL implementation of the `ShaderDriver` trait.

This crate drives real shader and program objects through the glow bindings.
The caller owns the window and the GL context; `GlDriver` only needs a
`glow::Context` that is current on the calling thread.
*/

mod gl_driver;
mod gl_stats;

pub use gl_driver::{GlDriver, stage_kind_to_gl};

// Re-export stats utilities
pub use gl_stats::{format_stats_report, print_stats_report};

// Re-export glow so callers build the context against the same version
pub use glow;
