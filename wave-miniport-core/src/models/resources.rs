/// Memory pool hint the host passes to object factories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PoolType {
    #[default]
    NonPaged,
    Paged,
}

/// A hardware resource assigned to the adapter by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDescriptor {
    Port { base: u16, length: u16 },
    Interrupt { vector: u32 },
    Dma { channel: u32 },
}

/// Resources the host passes to `init`; the miniport reads, never claims them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceList {
    entries: Vec<ResourceDescriptor>,
}

impl ResourceList {
    pub fn new(entries: Vec<ResourceDescriptor>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResourceDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn interrupt_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ResourceDescriptor::Interrupt { .. }))
            .count()
    }
}
