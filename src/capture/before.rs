use crate::capture::annotate::annotate_includes;
use crate::capture::ShaderPair;
use crate::render::material::{Material, ShaderDescriptor};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Captures a material's template sources right before the renderer
/// compiles them.
///
/// The installed hook both reads and rewrites the renderer's descriptor:
/// it annotates every `#include` line in place, so the program that gets
/// compiled is built from the annotated text, and it keeps a copy of that
/// annotated text. The renderer depends on the rewritten strings being in
/// the descriptor when the hook returns.
///
/// A capture is pending until [`commit`](Self::commit) is called by the
/// display side, at most one UI frame later.
#[derive(Debug, Default)]
pub struct BeforeCompileCapture {
    pending: Rc<RefCell<Option<ShaderPair>>>,
    committed: ShaderPair,
    captures: u32,
}

impl BeforeCompileCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the capture hook on `material`. Replaces any previous hook
    /// and forces a recompile.
    pub fn install(&self, material: &mut Material) {
        let pending = Rc::clone(&self.pending);
        material.set_on_before_compile(move |descriptor: &mut ShaderDescriptor| {
            annotate_descriptor(descriptor);
            debug!(
                "Captured {} before compile ({} / {} bytes)",
                descriptor.name,
                descriptor.vertex_shader.len(),
                descriptor.fragment_shader.len()
            );
            *pending.borrow_mut() = Some(ShaderPair::new(
                descriptor.vertex_shader.clone(),
                descriptor.fragment_shader.clone(),
            ));
        });
    }

    /// Moves a pending capture into the visible pair. Returns whether
    /// anything changed.
    pub fn commit(&mut self) -> bool {
        match self.pending.borrow_mut().take() {
            Some(pair) => {
                self.committed = pair;
                self.captures += 1;
                true
            }
            None => false,
        }
    }

    /// Last committed pair; empty until the first compile has been committed.
    pub fn current(&self) -> &ShaderPair {
        &self.committed
    }

    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Number of captures committed so far.
    pub fn captures(&self) -> u32 {
        self.captures
    }
}

/// Annotates both stages of a descriptor in place.
pub fn annotate_descriptor(descriptor: &mut ShaderDescriptor) {
    descriptor.vertex_shader = annotate_includes(&descriptor.vertex_shader);
    descriptor.fragment_shader = annotate_includes(&descriptor.fragment_shader);
}
