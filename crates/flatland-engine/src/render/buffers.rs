/// What an [`ExactSizeSlot`] decided for a new required size.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotAction {
    /// Release the old buffer (if any) and allocate exactly `size` bytes.
    Allocate { size: u64 },
    /// Existing buffer already has the required size; overwrite it.
    Reuse,
    /// Required size dropped to zero; release the buffer.
    Release,
    /// Nothing allocated and nothing required.
    Idle,
}

/// Exact-size reallocation policy for one GPU buffer.
///
/// Capacity always equals `element_size * count`: there is no slack and no
/// amortized growth, so every count change is a reallocation while repeated
/// uploads at the same count reuse the allocation.
#[derive(Debug, Default, Clone)]
pub struct ExactSizeSlot {
    size: Option<u64>,
    generation: u64,
}

impl ExactSizeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `required` as the new size and returns what to do with the buffer.
    pub fn resolve(&mut self, required: u64) -> SlotAction {
        match (self.size, required) {
            (None, 0) => SlotAction::Idle,
            (Some(_), 0) => {
                self.size = None;
                self.generation += 1;
                SlotAction::Release
            }
            (Some(current), r) if current == r => SlotAction::Reuse,
            (_, r) => {
                self.size = Some(r);
                self.generation += 1;
                SlotAction::Allocate { size: r }
            }
        }
    }

    /// Current capacity in bytes, `None` when nothing is allocated.
    #[inline]
    pub fn capacity(&self) -> Option<u64> {
        self.size
    }

    /// Bumped every time the backing buffer is replaced or released.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A GPU buffer managed by an [`ExactSizeSlot`].
pub(crate) struct GpuBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    slot: ExactSizeSlot,
    buffer: Option<wgpu::Buffer>,
}

impl GpuBuffer {
    pub(crate) fn new(label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            slot: ExactSizeSlot::new(),
            buffer: None,
        }
    }

    /// Makes the buffer hold exactly `bytes`, reallocating only on size change.
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
    ) -> SlotAction {
        let action = self.slot.resolve(bytes.len() as u64);

        match action {
            SlotAction::Allocate { size } => {
                if let Some(old) = self.buffer.take() {
                    old.destroy();
                }
                log::debug!("{}: allocating {size} bytes", self.label);
                self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(self.label),
                    size,
                    usage: self.usage,
                    mapped_at_creation: false,
                }));
            }
            SlotAction::Release => {
                if let Some(old) = self.buffer.take() {
                    log::debug!("{}: released", self.label);
                    old.destroy();
                }
            }
            SlotAction::Reuse | SlotAction::Idle => {}
        }

        if let Some(buf) = self.buffer.as_ref() {
            queue.write_buffer(buf, 0, bytes);
        }

        action
    }

    #[inline]
    pub(crate) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.slot.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upload_allocates_exact_size() {
        let mut slot = ExactSizeSlot::new();
        assert_eq!(slot.resolve(96), SlotAction::Allocate { size: 96 });
        assert_eq!(slot.capacity(), Some(96));
    }

    #[test]
    fn same_size_reuses() {
        let mut slot = ExactSizeSlot::new();
        slot.resolve(48);
        let before = slot.generation();
        assert_eq!(slot.resolve(48), SlotAction::Reuse);
        assert_eq!(slot.generation(), before);
    }

    #[test]
    fn any_size_change_reallocates_exactly() {
        let mut slot = ExactSizeSlot::new();
        slot.resolve(96);
        assert_eq!(slot.resolve(144), SlotAction::Allocate { size: 144 });
        // Shrinking does not keep slack.
        assert_eq!(slot.resolve(48), SlotAction::Allocate { size: 48 });
        assert_eq!(slot.capacity(), Some(48));
        assert_eq!(slot.generation(), 3);
    }

    #[test]
    fn zero_releases_then_idles() {
        let mut slot = ExactSizeSlot::new();
        assert_eq!(slot.resolve(0), SlotAction::Idle);
        slot.resolve(32);
        assert_eq!(slot.resolve(0), SlotAction::Release);
        assert_eq!(slot.capacity(), None);
        assert_eq!(slot.resolve(0), SlotAction::Idle);
        assert_eq!(slot.resolve(32), SlotAction::Allocate { size: 32 });
    }
}
