use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::models::error::WaveError;

/// Physical wave devices one adapter can expose.
pub const MAX_WAVE_DEVICES: usize = 4;

/// Identity of one miniport instance, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MiniportId(u64);

impl MiniportId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MiniportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wave#{}", self.0)
    }
}

/// Index of a wave-device slot; always `< MAX_WAVE_DEVICES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveSlot(u8);

impl WaveSlot {
    pub const HIFI: WaveSlot = WaveSlot(0);

    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_WAVE_DEVICES).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Slot 0 carries capture, SPDIF and drives chip power.
    pub fn is_hifi(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Adapter-wide table of which miniport occupies which wave-device slot.
///
/// Claim and release run under one lock so two miniports initialising at
/// once can never land in the same slot.
#[derive(Debug, Default)]
pub struct SlotTable {
    slots: Mutex<[Option<MiniportId>; MAX_WAVE_DEVICES]>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the first free slot to `owner`.
    ///
    /// Claiming twice for the same owner returns the slot it already holds.
    pub fn claim(&self, owner: MiniportId) -> Result<WaveSlot, WaveError> {
        let mut slots = self.slots.lock();
        if let Some(index) = slots.iter().position(|s| *s == Some(owner)) {
            warn!("{} already holds slot {}", owner, index);
            return Ok(WaveSlot(index as u8));
        }
        let Some(index) = slots.iter().position(Option::is_none) else {
            warn!("no free wave slot for {}", owner);
            return Err(WaveError::InsufficientResources(format!(
                "all {} wave device slots are occupied",
                MAX_WAVE_DEVICES
            )));
        };
        slots[index] = Some(owner);
        debug!("{} claimed slot {}", owner, index);
        Ok(WaveSlot(index as u8))
    }

    /// Vacates whichever slot `owner` holds, returning it.
    pub fn release(&self, owner: MiniportId) -> Option<WaveSlot> {
        let mut slots = self.slots.lock();
        let index = slots.iter().position(|s| *s == Some(owner))?;
        slots[index] = None;
        debug!("{} released slot {}", owner, index);
        Some(WaveSlot(index as u8))
    }

    pub fn occupant(&self, slot: WaveSlot) -> Option<MiniportId> {
        self.slots.lock()[slot.index()]
    }

    pub fn slot_of(&self, owner: MiniportId) -> Option<WaveSlot> {
        self.slots
            .lock()
            .iter()
            .position(|s| *s == Some(owner))
            .map(|index| WaveSlot(index as u8))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn claims_first_free_slot_in_order() {
        let table = SlotTable::new();
        let ids: Vec<_> = (0..4).map(|_| MiniportId::next()).collect();
        for (expected, id) in ids.iter().enumerate() {
            assert_eq!(table.claim(*id).unwrap().index(), expected);
        }
        assert_eq!(table.occupied_count(), 4);
    }

    #[test]
    fn fifth_claim_fails() {
        let table = SlotTable::new();
        for _ in 0..MAX_WAVE_DEVICES {
            table.claim(MiniportId::next()).unwrap();
        }
        assert!(matches!(
            table.claim(MiniportId::next()),
            Err(WaveError::InsufficientResources(_))
        ));
    }

    #[test]
    fn released_slot_is_reused() {
        let table = SlotTable::new();
        let a = MiniportId::next();
        let b = MiniportId::next();
        let c = MiniportId::next();
        table.claim(a).unwrap();
        table.claim(b).unwrap();

        assert_eq!(table.release(a), Some(WaveSlot::HIFI));
        assert_eq!(table.occupant(WaveSlot::HIFI), None);
        assert_eq!(table.claim(c).unwrap(), WaveSlot::HIFI);
        assert_eq!(table.slot_of(b).map(WaveSlot::index), Some(1));
    }

    #[test]
    fn release_of_unknown_owner_is_none() {
        let table = SlotTable::new();
        table.claim(MiniportId::next()).unwrap();
        assert_eq!(table.release(MiniportId::next()), None);
        assert_eq!(table.occupied_count(), 1);
    }

    #[test]
    fn repeated_claim_keeps_slot() {
        let table = SlotTable::new();
        let a = MiniportId::next();
        let first = table.claim(a).unwrap();
        assert_eq!(table.claim(a).unwrap(), first);
        assert_eq!(table.occupied_count(), 1);
    }

    #[test]
    fn concurrent_claims_are_injective() {
        let table = Arc::new(SlotTable::new());
        let handles: Vec<_> = (0..MAX_WAVE_DEVICES)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.claim(MiniportId::next()).unwrap())
            })
            .collect();
        let slots: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(slots.len(), MAX_WAVE_DEVICES);
    }

    #[test]
    fn slot_indices_stop_at_table_size() {
        assert!(WaveSlot::HIFI.is_hifi());
        assert_eq!(WaveSlot::new(3).map(WaveSlot::index), Some(3));
        assert_eq!(WaveSlot::new(MAX_WAVE_DEVICES), None);
    }
}
