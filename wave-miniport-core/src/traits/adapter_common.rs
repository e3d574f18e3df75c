use std::sync::Arc;

use crate::models::config::AdapterCapabilities;
use crate::models::error::WaveError;
use crate::models::property::PropertyRequest;
use crate::registry::slot_table::SlotTable;
use crate::traits::hardware::Hardware;

/// The adapter-wide object shared by every wave miniport on one card.
///
/// Owns power sequencing of the interrupt line, the hardware handle and the
/// table of wave-device slots.
pub trait AdapterCommon: Send + Sync {
    fn capabilities(&self) -> AdapterCapabilities;

    fn hardware(&self) -> Arc<dyn Hardware>;

    /// Slot table shared by all wave miniports of this adapter.
    fn wave_slots(&self) -> &SlotTable;

    /// Reconnects the interrupt service routine after the chip is powered.
    fn connect_interrupts(&self) -> Result<(), WaveError>;

    /// Disconnects the interrupt service routine before the chip sleeps.
    fn disconnect_interrupts(&self);

    /// Vendor-private property set, serviced adapter-wide.
    fn private_property(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError>;
}

/// The untyped adapter object passed to `init`.
///
/// Returns `None` when the object does not expose the adapter-common interface.
pub trait UnknownAdapter {
    fn adapter_common(&self) -> Option<Arc<dyn AdapterCommon>>;
}

impl<T: AdapterCommon + 'static> UnknownAdapter for Arc<T> {
    fn adapter_common(&self) -> Option<Arc<dyn AdapterCommon>> {
        let common: Arc<dyn AdapterCommon> = self.clone();
        Some(common)
    }
}
