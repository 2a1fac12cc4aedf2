pub mod after;
pub mod annotate;
pub mod before;

pub use after::capture_after_compile;
pub use annotate::{annotate_includes, with_comment};
pub use before::BeforeCompileCapture;

/// Vertex and fragment source of one material. `None` until captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderPair {
    pub vertex_shader: Option<String>,
    pub fragment_shader: Option<String>,
}

impl ShaderPair {
    pub fn new(vertex_shader: impl Into<String>, fragment_shader: impl Into<String>) -> Self {
        Self {
            vertex_shader: Some(vertex_shader.into()),
            fragment_shader: Some(fragment_shader.into()),
        }
    }

    /// The fragment or vertex source.
    pub fn stage(&self, is_fragment: bool) -> Option<&str> {
        if is_fragment {
            self.fragment_shader.as_deref()
        } else {
            self.vertex_shader.as_deref()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_shader.is_none() && self.fragment_shader.is_none()
    }
}
