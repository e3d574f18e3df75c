use std::sync::Arc;

use log::{debug, error};

use crate::miniport::pins::PinInstances;
use crate::models::error::WaveError;
use crate::models::format::DataFormat;
use crate::models::resources::PoolType;
use crate::stream::{CaptureStream, PlaybackStream, StreamBinding, WaveStream};
use crate::traits::hardware::{DmaChannelId, Hardware, ServiceGroupId};
use crate::traits::port::WavePort;

/// A successfully created stream and the hardware handles bound to it.
pub struct NewStream {
    pub stream: Arc<WaveStream>,
    pub dma_channel: DmaChannelId,
    pub service_group: ServiceGroupId,
}

/// Builds stream objects for one initialised miniport.
pub struct StreamFactory<'a> {
    hardware: Arc<dyn Hardware>,
    port: Arc<dyn WavePort>,
    pins: &'a PinInstances,
}

impl<'a> StreamFactory<'a> {
    pub fn new(hardware: Arc<dyn Hardware>, port: Arc<dyn WavePort>, pins: &'a PinInstances) -> Self {
        Self { hardware, port, pins }
    }

    /// Creates the stream variant for `capture` on `pin_id`.
    ///
    /// On any failure nothing stays allocated: the pin instance and any
    /// hardware handle already taken are released before returning.
    pub fn create(
        &self,
        pin_id: u32,
        capture: bool,
        format: &DataFormat,
        pool: PoolType,
    ) -> Result<NewStream, WaveError> {
        let instance = self.pins.reserve(pin_id)?;
        let binding = StreamBinding {
            hardware: Arc::clone(&self.hardware),
            port: Arc::clone(&self.port),
            instance,
            pool,
        };

        let stream = if capture {
            CaptureStream::init(binding, &format.wave).map(WaveStream::Capture)
        } else {
            PlaybackStream::init(binding, &format.wave).map(WaveStream::Playback)
        }
        .map_err(|e| {
            error!("pin {}: stream init failed: {}", pin_id, e);
            e
        })?;

        let stream = Arc::new(stream);
        debug!(
            "pin {}: {:?} stream created ({:?} pool)",
            pin_id,
            stream.direction(),
            pool
        );
        Ok(NewStream {
            dma_channel: stream.dma_channel(),
            service_group: stream.service_group(),
            stream,
        })
    }
}
