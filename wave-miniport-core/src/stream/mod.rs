//! Stream objects.
//!
//! One stream per open pin instance. Direction is a closed set, so the
//! capability surface (`init`, interrupt service, capability query) is
//! dispatched by matching on [`WaveStream`] rather than through a trait
//! object.

pub mod capture;
pub mod factory;
pub mod playback;

use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::miniport::pins::PinInstance;
use crate::models::capability::Capability;
use crate::models::error::WaveError;
use crate::models::format::NegotiatedFormat;
use crate::models::resources::PoolType;
use crate::models::state::KsState;
use crate::traits::hardware::{DmaChannelId, Hardware, ServiceGroupId};
use crate::traits::port::WavePort;

pub use capture::CaptureStream;
pub use factory::{NewStream, StreamFactory};
pub use playback::PlaybackStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamDirection {
    Capture,
    Playback,
}

/// What a stream needs from its owning miniport to initialise.
pub struct StreamBinding {
    pub hardware: Arc<dyn Hardware>,
    pub port: Arc<dyn WavePort>,
    pub instance: PinInstance,
    pub pool: PoolType,
}

/// State shared by both stream directions.
///
/// Holds the hardware handles, not the resources behind them; the DMA
/// channel is handed back to the hardware layer on drop.
pub(crate) struct StreamCore {
    format: NegotiatedFormat,
    hardware: Arc<dyn Hardware>,
    port: Arc<dyn WavePort>,
    dma_channel: DmaChannelId,
    service_group: ServiceGroupId,
    state: Mutex<KsState>,
    pool: PoolType,
    instance: PinInstance,
}

impl StreamCore {
    pub(crate) fn open(binding: StreamBinding, capture: bool, format: &NegotiatedFormat) -> Result<Self, WaveError> {
        let StreamBinding {
            hardware,
            port,
            instance,
            pool,
        } = binding;
        let pin_id = instance.pin_id();
        let dma_channel = hardware.open_dma_channel(pin_id, capture, format)?;
        let service_group = match hardware.open_service_group() {
            Ok(group) => group,
            Err(e) => {
                hardware.close_dma_channel(dma_channel);
                return Err(e);
            }
        };
        debug!(
            "pin {}: stream opened on dma {:?}, group {:?} ({}ch/{}Hz/{}bit)",
            pin_id, dma_channel, service_group, format.channels, format.samples_per_sec, format.bits_per_sample
        );
        Ok(Self {
            format: *format,
            hardware,
            port,
            dma_channel,
            service_group,
            state: Mutex::new(KsState::Stop),
            pool,
            instance,
        })
    }

    fn set_state(&self, next: KsState) -> Result<(), WaveError> {
        let mut state = self.state.lock();
        if *state == next {
            return Ok(());
        }
        if !state.can_transition_to(next) {
            warn!("pin {}: skipping from {:?} to {:?}", self.instance.pin_id(), *state, next);
        }
        if next.is_running() != state.is_running() {
            self.hardware.set_dma_running(self.dma_channel, next.is_running())?;
        }
        trace!("pin {}: {:?} -> {:?}", self.instance.pin_id(), *state, next);
        *state = next;
        Ok(())
    }

    fn interrupt_service(&self) {
        if self.state.lock().is_running() {
            self.port.notify(self.service_group);
        }
    }
}

impl Drop for StreamCore {
    fn drop(&mut self) {
        if self.state.get_mut().is_running() {
            if let Err(e) = self.hardware.set_dma_running(self.dma_channel, false) {
                warn!("pin {}: failed to stop dma on close: {}", self.instance.pin_id(), e);
            }
        }
        self.hardware.close_dma_channel(self.dma_channel);
        debug!("pin {}: stream closed", self.instance.pin_id());
    }
}

/// An open pin instance.
pub enum WaveStream {
    Capture(CaptureStream),
    Playback(PlaybackStream),
}

impl WaveStream {
    fn core(&self) -> &StreamCore {
        match self {
            Self::Capture(s) => &s.core,
            Self::Playback(s) => &s.core,
        }
    }

    pub fn direction(&self) -> StreamDirection {
        match self {
            Self::Capture(_) => StreamDirection::Capture,
            Self::Playback(_) => StreamDirection::Playback,
        }
    }

    pub fn pin_id(&self) -> u32 {
        self.core().instance.pin_id()
    }

    pub fn format(&self) -> &NegotiatedFormat {
        &self.core().format
    }

    pub fn dma_channel(&self) -> DmaChannelId {
        self.core().dma_channel
    }

    pub fn service_group(&self) -> ServiceGroupId {
        self.core().service_group
    }

    pub fn pool(&self) -> PoolType {
        self.core().pool
    }

    pub fn state(&self) -> KsState {
        *self.core().state.lock()
    }

    /// Moves the stream to `state`, starting or stopping DMA when crossing `Run`.
    pub fn set_state(&self, state: KsState) -> Result<(), WaveError> {
        self.core().set_state(state)
    }

    /// Interrupt-path hook: asks the port to service this stream while it runs.
    pub fn interrupt_service(&self) {
        match self {
            Self::Capture(s) => s.interrupt_service(),
            Self::Playback(s) => s.interrupt_service(),
        }
    }

    pub fn query_capability(&self, capability: Capability) -> Result<(), WaveError> {
        let supported = match self {
            Self::Capture(s) => s.supports(capability),
            Self::Playback(s) => s.supports(capability),
        };
        if supported {
            Ok(())
        } else {
            warn!("{:?} stream: capability {:?} not provided", self.direction(), capability);
            Err(WaveError::InvalidParameter(format!("stream does not provide {:?}", capability)))
        }
    }

    /// DRM content id. Accepted without recording any rights.
    pub fn set_content_id(&self, content_id: u32) -> Result<(), WaveError> {
        debug!("pin {}: content id {} accepted", self.pin_id(), content_id);
        Ok(())
    }

    pub fn as_playback(&self) -> Option<&PlaybackStream> {
        match self {
            Self::Playback(s) => Some(s),
            Self::Capture(_) => None,
        }
    }
}
