use super::{ObjectKind, PrimitiveObject, RenderObject, TexturedObject};

/// Outcome of [`ObjectRegistry::replace_all`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ReplaceSummary {
    pub primitives: usize,
    pub textured: usize,
    /// Textured objects dropped because their image was unavailable.
    pub excluded: usize,
}

/// Current scene, split into one ordered partition per object kind.
///
/// Partition order is draw order. For primitives it is also the instance
/// index, so row `i` of every per-primitive GPU buffer belongs to
/// `primitives()[i]`.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    primitives: Vec<PrimitiveObject>,
    textured: Vec<TexturedObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both partitions and refills them from `objects`, keeping input
    /// order within each kind.
    ///
    /// Textured objects without a drawable image are excluded with a warning.
    pub fn replace_all<I>(&mut self, objects: I) -> ReplaceSummary
    where
        I: IntoIterator<Item = RenderObject>,
    {
        self.primitives.clear();
        self.textured.clear();

        let mut excluded = 0;
        for object in objects {
            match object {
                RenderObject::Primitive(p) => self.primitives.push(p),
                RenderObject::Textured(t) => {
                    if t.drawable_image().is_some() {
                        self.textured.push(t);
                    } else {
                        log::warn!("textured object '{}' has no image; excluded from scene", t.label);
                        excluded += 1;
                    }
                }
            }
        }

        ReplaceSummary {
            primitives: self.primitives.len(),
            textured: self.textured.len(),
            excluded,
        }
    }

    #[inline]
    pub fn count_of(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::Primitive => self.primitives.len(),
            ObjectKind::Textured => self.textured.len(),
        }
    }

    #[inline]
    pub fn primitives(&self) -> &[PrimitiveObject] {
        &self.primitives
    }

    #[inline]
    pub fn textured(&self) -> &[TexturedObject] {
        &self.textured
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.textured.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assets::Bitmap;
    use crate::coords::{Color, Rect};

    fn prim(label: &str) -> RenderObject {
        RenderObject::primitive(label, Rect::new(0.0, 0.0, 1.0, 1.0), Color::white())
    }

    fn tex(label: &str) -> RenderObject {
        let bmp = Arc::new(Bitmap::from_fn(1, 1, |_, _| [0, 0, 0, 255]));
        RenderObject::textured(label, Rect::new(0.0, 0.0, 1.0, 1.0), bmp)
    }

    fn broken(label: &str) -> RenderObject {
        let mut t = TexturedObject::new(
            label,
            Rect::default(),
            Arc::new(Bitmap::from_fn(1, 1, |_, _| [0; 4])),
        );
        t.image = None;
        RenderObject::Textured(t)
    }

    #[test]
    fn partitions_regardless_of_interleaving() {
        let mut reg = ObjectRegistry::new();
        let summary = reg.replace_all([tex("t0"), prim("p0"), tex("t1"), prim("p1"), prim("p2")]);

        assert_eq!(summary, ReplaceSummary { primitives: 3, textured: 2, excluded: 0 });
        assert_eq!(reg.count_of(ObjectKind::Primitive), 3);
        assert_eq!(reg.count_of(ObjectKind::Textured), 2);
    }

    #[test]
    fn preserves_input_order_within_kind() {
        let mut reg = ObjectRegistry::new();
        reg.replace_all([prim("a"), tex("x"), prim("b"), tex("y"), prim("c")]);

        let prims: Vec<_> = reg.primitives().iter().map(|p| p.label.as_str()).collect();
        let texs: Vec<_> = reg.textured().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(prims, ["a", "b", "c"]);
        assert_eq!(texs, ["x", "y"]);
    }

    #[test]
    fn replace_discards_previous_scene() {
        let mut reg = ObjectRegistry::new();
        reg.replace_all([prim("a"), tex("x")]);
        reg.replace_all([prim("b")]);

        assert_eq!(reg.count_of(ObjectKind::Primitive), 1);
        assert_eq!(reg.count_of(ObjectKind::Textured), 0);
        assert_eq!(reg.primitives()[0].label, "b");
    }

    #[test]
    fn empty_replace_empties_registry() {
        let mut reg = ObjectRegistry::new();
        reg.replace_all([prim("a")]);
        reg.replace_all(Vec::new());
        assert!(reg.is_empty());
    }

    #[test]
    fn textured_without_image_is_excluded() {
        let mut reg = ObjectRegistry::new();
        let summary = reg.replace_all([tex("ok"), broken("bad"), prim("p")]);

        assert_eq!(summary.excluded, 1);
        assert_eq!(reg.count_of(ObjectKind::Textured), 1);
        assert_eq!(reg.textured()[0].label, "ok");
        assert_eq!(reg.count_of(ObjectKind::Primitive), 1);
    }
}
