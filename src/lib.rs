pub mod capture;
pub mod config;
pub mod render;
pub mod ui;
pub mod viewer;

// Re-export commonly used types
pub use capture::{annotate_includes, capture_after_compile, BeforeCompileCapture, ShaderPair};
pub use config::AppConfig;
pub use render::{GlBackend, GpuBackend, Renderer, Scene, ShaderError};
pub use ui::{DisplayController, DisplayMode, ShaderOverlay};
pub use viewer::ShaderViewer;
