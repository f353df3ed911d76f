use std::borrow::Cow;

use crate::scene::ObjectKind;

/// One WGSL program: source text, entry point and a debug label.
#[derive(Debug, Clone)]
pub struct ProgramSource {
    pub label: Cow<'static, str>,
    pub code: Cow<'static, str>,
    pub entry_point: Cow<'static, str>,
}

impl ProgramSource {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        code: impl Into<Cow<'static, str>>,
        entry_point: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
            entry_point: entry_point.into(),
        }
    }

    pub(crate) fn compile(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_ref()),
            source: wgpu::ShaderSource::Wgsl(self.code.clone()),
        })
    }
}

/// Vertex + fragment programs for one object kind.
#[derive(Debug, Clone)]
pub struct KindPrograms {
    pub vertex: ProgramSource,
    pub fragment: ProgramSource,
}

/// Programs for every object kind.
///
/// Custom programs must declare the same bindings as the kind's layout
/// (see [`layout_entries`](super::layout_entries)); a mismatch is a setup
/// error reported by wgpu when the pipeline is created.
#[derive(Debug, Clone)]
pub struct ShaderSet {
    pub primitive: KindPrograms,
    pub textured: KindPrograms,
}

impl ShaderSet {
    /// The programs shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            primitive: KindPrograms {
                vertex: ProgramSource::new(
                    "flatland primitive vs",
                    include_str!("shaders/primitive.vert.wgsl"),
                    "vs",
                ),
                fragment: ProgramSource::new(
                    "flatland primitive fs",
                    include_str!("shaders/primitive.frag.wgsl"),
                    "fs",
                ),
            },
            textured: KindPrograms {
                vertex: ProgramSource::new(
                    "flatland textured vs",
                    include_str!("shaders/textured.vert.wgsl"),
                    "vs",
                ),
                fragment: ProgramSource::new(
                    "flatland textured fs",
                    include_str!("shaders/textured.frag.wgsl"),
                    "fs",
                ),
            },
        }
    }

    #[inline]
    pub fn programs(&self, kind: ObjectKind) -> &KindPrograms {
        match kind {
            ObjectKind::Primitive => &self.primitive,
            ObjectKind::Textured => &self.textured,
        }
    }
}

impl Default for ShaderSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout_entries;

    #[test]
    fn builtin_programs_declare_every_layout_binding() {
        let set = ShaderSet::builtin();
        for kind in ObjectKind::ALL {
            let p = set.programs(kind);
            for entry in layout_entries(kind) {
                let decl = format!("@binding({})", entry.binding);
                assert!(
                    p.vertex.code.contains(&decl) || p.fragment.code.contains(&decl),
                    "{} programs never declare {decl}",
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn builtin_entry_points_exist() {
        let set = ShaderSet::builtin();
        for kind in ObjectKind::ALL {
            let p = set.programs(kind);
            assert!(p.vertex.code.contains(&format!("fn {}(", p.vertex.entry_point)));
            assert!(p.fragment.code.contains(&format!("fn {}(", p.fragment.entry_point)));
        }
    }
}
