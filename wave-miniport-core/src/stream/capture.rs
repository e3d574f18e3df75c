use log::warn;

use crate::models::capability::Capability;
use crate::models::error::WaveError;
use crate::models::format::NegotiatedFormat;
use crate::stream::{StreamBinding, StreamCore};

/// Record stream on the HiFi capture pin.
pub struct CaptureStream {
    pub(crate) core: StreamCore,
}

impl CaptureStream {
    pub fn init(binding: StreamBinding, format: &NegotiatedFormat) -> Result<Self, WaveError> {
        if format.is_compressed() {
            warn!("capture stream: compressed format requested");
            return Err(WaveError::InvalidParameter("capture accepts PCM only".into()));
        }
        Ok(Self {
            core: StreamCore::open(binding, true, format)?,
        })
    }

    pub(crate) fn interrupt_service(&self) {
        self.core.interrupt_service();
    }

    pub(crate) fn supports(&self, capability: Capability) -> bool {
        matches!(capability, Capability::Unknown | Capability::MiniportWaveCyclicStream)
    }
}
