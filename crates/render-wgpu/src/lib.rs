//! wgpu quad renderer.
//!
//! Compiles a fixed vertex/fragment shader pair, uploads a static shape in
//! normalized device coordinates, and draws it once per frame.
//!
//! # Invariants
//! - Geometry is uploaded once and never mutated.
//! - Shader and pipeline errors are logged, never fatal.
//! - The renderer does not read camera state.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{QuadRenderer, RendererOptions, CLEAR_COLOR};
pub use mesh::{Shape, Vertex};
pub use shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

/// Errors and diagnostics from the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("unknown shape: {0:?} (expected \"quad\" or \"triangle\")")]
    UnknownShape(String),
    #[error("{stage} shader compilation failed: {message}")]
    ShaderCompilation {
        stage: &'static str,
        message: String,
    },
    #[error("shader program linking failed: {0}")]
    ProgramLink(String),
}

pub fn crate_info() -> &'static str {
    "quadcam-render-wgpu v0.1.0"
}
