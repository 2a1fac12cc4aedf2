pub mod backend;
pub mod camera;
pub mod gl_backend;
pub mod material;
pub mod mesh;
pub mod mock;
pub mod preprocess;
pub mod renderer;
pub mod scene;
pub mod shader_lib;
pub mod shaders;

pub use backend::{GpuBackend, RenderError, ShaderHandle};
pub use camera::Camera;
pub use gl_backend::GlBackend;
pub use material::{Material, ShaderDescriptor};
pub use mesh::MeshData;
pub use renderer::{ProgramInfo, RenderInfo, Renderer, RendererOptions};
pub use scene::{Scene, SceneMesh};
pub use shaders::{ShaderError, ShaderProgram};
