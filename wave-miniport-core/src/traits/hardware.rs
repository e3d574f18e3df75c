use crate::models::error::WaveError;
use crate::models::format::NegotiatedFormat;
use crate::models::power::HardwarePowerLevel;

/// Handle to a DMA channel owned by the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DmaChannelId(pub u32);

/// Handle to a service group owned by the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceGroupId(pub u32);

/// Register-level access to the chip.
///
/// Streams keep only the handles returned here; the hardware layer owns the
/// underlying channels and groups.
pub trait Hardware: Send + Sync {
    fn set_power_state(&self, level: HardwarePowerLevel);

    fn open_dma_channel(
        &self,
        pin_id: u32,
        capture: bool,
        format: &NegotiatedFormat,
    ) -> Result<DmaChannelId, WaveError>;

    fn open_service_group(&self) -> Result<ServiceGroupId, WaveError>;

    fn set_dma_running(&self, channel: DmaChannelId, running: bool) -> Result<(), WaveError>;

    /// Returns a channel obtained from `open_dma_channel`; the handle is dead afterwards.
    fn close_dma_channel(&self, channel: DmaChannelId);
}
