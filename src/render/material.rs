use crate::render::shader_lib::{self, ShaderTemplate};
use glam::Vec3;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_MATERIAL_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Cache key of a compiled program: a material at one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    pub material: MaterialId,
    pub version: u32,
}

/// Mutable shader text handed to a material's pre-compile hook.
///
/// Whatever the hook leaves in `vertex_shader` and `fragment_shader` is what
/// the renderer resolves and compiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderDescriptor {
    pub name: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
}

pub type BeforeCompileHook = Box<dyn FnMut(&mut ShaderDescriptor)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    Physical {
        color: Vec3,
        roughness: f32,
        metalness: f32,
    },
}

impl MaterialKind {
    pub fn template(&self) -> ShaderTemplate {
        match self {
            MaterialKind::Physical { .. } => shader_lib::MESH_PHYSICAL,
        }
    }
}

pub struct Material {
    id: MaterialId,
    pub name: String,
    pub kind: MaterialKind,
    pub opacity: f32,
    version: u32,
    on_before_compile: Option<BeforeCompileHook>,
}

impl Material {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            kind,
            opacity: 1.0,
            version: 0,
            on_before_compile: None,
        }
    }

    /// Physical material with default roughness and metalness.
    pub fn physical(color: Vec3) -> Self {
        Self::new(
            "physical",
            MaterialKind::Physical {
                color,
                roughness: 1.0,
                metalness: 0.0,
            },
        )
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn program_key(&self) -> ProgramKey {
        ProgramKey {
            material: self.id,
            version: self.version,
        }
    }

    /// Marks the material dirty; the next compile pass builds a new program
    /// and runs the pre-compile hook again.
    pub fn needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_on_before_compile<F>(&mut self, hook: F)
    where
        F: FnMut(&mut ShaderDescriptor) + 'static,
    {
        self.on_before_compile = Some(Box::new(hook));
        self.needs_update();
    }

    pub fn has_before_compile(&self) -> bool {
        self.on_before_compile.is_some()
    }

    /// Fresh descriptor filled from the material's template.
    pub fn descriptor(&self) -> ShaderDescriptor {
        let template = self.kind.template();
        ShaderDescriptor {
            name: template.name.to_string(),
            vertex_shader: template.vertex.to_string(),
            fragment_shader: template.fragment.to_string(),
        }
    }

    pub(crate) fn run_before_compile(&mut self, descriptor: &mut ShaderDescriptor) {
        if let Some(hook) = self.on_before_compile.as_mut() {
            hook(descriptor);
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("has_before_compile", &self.has_before_compile())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Material::physical(Vec3::X);
        let b = Material::physical(Vec3::X);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_hook_bumps_version_and_edits_descriptor() {
        let mut material = Material::physical(Vec3::new(1.0, 0.0, 0.0));
        let before = material.program_key();

        material.set_on_before_compile(|d| d.fragment_shader.push_str("// edited"));
        assert_ne!(material.program_key(), before);

        let mut descriptor = material.descriptor();
        material.run_before_compile(&mut descriptor);
        assert!(descriptor.fragment_shader.ends_with("// edited"));
        assert_eq!(descriptor.name, "MeshPhysicalMaterial");
    }
}
