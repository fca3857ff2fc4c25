/// Driver module - the graphics driver trait and the in-memory mock

pub mod shader_driver;
pub mod mock_driver;
pub(crate) mod mock_glsl;

pub use shader_driver::*;
pub use mock_driver::*;
