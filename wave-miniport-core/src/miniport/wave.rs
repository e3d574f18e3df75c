use std::sync::Arc;

use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::miniport::descriptors::{self, PIN_SPDIF, PIN_WAVE_IN};
use crate::miniport::pins::{PinCount, PinInstances};
use crate::models::capability::Capability;
use crate::models::config::{AdapterCapabilities, WaveConfig};
use crate::models::descriptor::FilterDescriptor;
use crate::models::error::WaveError;
use crate::models::format::{DataFormat, DataRange};
use crate::models::power::DevicePowerState;
use crate::models::resources::{PoolType, ResourceList};
use crate::models::state::MiniportState;
use crate::processing::intersection::{self, NegotiationPolicy, PinRole};
use crate::registry::slot_table::{MiniportId, WaveSlot};
use crate::stream::{NewStream, StreamFactory};
use crate::traits::adapter_common::{AdapterCommon, UnknownAdapter};
use crate::traits::port::WavePort;

/// 3D listener parameters the host may store on the filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListenerRecord {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub orientation_front: [f32; 3],
    pub orientation_top: [f32; 3],
}

impl Default for ListenerRecord {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            velocity: [0.0; 3],
            orientation_front: [0.0, 0.0, 1.0],
            orientation_top: [0.0, 1.0, 0.0],
        }
    }
}

/// References an initialised miniport holds until teardown.
struct Binding {
    adapter: Arc<dyn AdapterCommon>,
    port: Arc<dyn WavePort>,
    slot: WaveSlot,
    pins: Arc<PinInstances>,
}

/// Cheap clones of the binding, taken so no lock is held across collaborator calls.
pub(crate) struct BoundView {
    pub adapter: Arc<dyn AdapterCommon>,
    pub port: Arc<dyn WavePort>,
    pub slot: WaveSlot,
    pub pins: Arc<PinInstances>,
}

struct Lifecycle {
    state: MiniportState,
    binding: Option<Binding>,
}

/// One wave filter instance: a single physical wave device on the adapter.
///
/// Lifecycle:
/// ```text
/// create_wave() → init() → description / data_range_intersection / new_stream /
///                          handle_property / power_change_notify ... → teardown()
/// ```
/// `teardown` also runs on drop, so the slot is vacated exactly once.
pub struct MiniportWave {
    id: MiniportId,
    pool: PoolType,
    config: WaveConfig,
    lifecycle: Mutex<Lifecycle>,
    pub(crate) power_state: Mutex<DevicePowerState>,
    listener: Mutex<ListenerRecord>,
}

/// Host factory entry point with the default configuration.
pub fn create_wave(pool: PoolType) -> Result<Arc<MiniportWave>, WaveError> {
    create_wave_with_config(pool, WaveConfig::default())
}

/// Host factory entry point.
pub fn create_wave_with_config(pool: PoolType, config: WaveConfig) -> Result<Arc<MiniportWave>, WaveError> {
    config.validate()?;
    let wave = Arc::new(MiniportWave {
        id: MiniportId::next(),
        pool,
        config,
        lifecycle: Mutex::new(Lifecycle {
            state: MiniportState::Uninitialized,
            binding: None,
        }),
        power_state: Mutex::new(DevicePowerState::D0),
        listener: Mutex::new(ListenerRecord::default()),
    });
    debug!("{} created ({:?} pool)", wave.id, pool);
    Ok(wave)
}

impl MiniportWave {
    pub fn id(&self) -> MiniportId {
        self.id
    }

    pub fn pool(&self) -> PoolType {
        self.pool
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn state(&self) -> MiniportState {
        self.lifecycle.lock().state
    }

    /// Slot this miniport occupies, once initialised.
    pub fn slot(&self) -> Option<WaveSlot> {
        self.lifecycle.lock().binding.as_ref().map(|b| b.slot)
    }

    pub fn power_state(&self) -> DevicePowerState {
        *self.power_state.lock()
    }

    /// Binds to the adapter and the port, then claims a wave-device slot.
    ///
    /// On failure every reference taken so far is dropped and the miniport
    /// stays uninitialised with no slot.
    pub fn init(
        &self,
        adapter: &dyn UnknownAdapter,
        resources: &ResourceList,
        port: Option<Arc<dyn WavePort>>,
    ) -> Result<(), WaveError> {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            MiniportState::Uninitialized => {}
            MiniportState::Initialized => {
                warn!("{}: init called twice", self.id);
                return Err(WaveError::InvalidDeviceRequest("already initialized".into()));
            }
            MiniportState::Destroyed => {
                error!("{}: init after teardown", self.id);
                return Err(WaveError::InvalidParameter("miniport was torn down".into()));
            }
        }

        let Some(port) = port else {
            error!("{}: init without a port", self.id);
            return Err(WaveError::InvalidParameter("port is required".into()));
        };

        debug!(
            "{}: {} resources ({} interrupts)",
            self.id,
            resources.len(),
            resources.interrupt_count()
        );

        let Some(adapter) = adapter.adapter_common() else {
            error!("{}: adapter does not expose the common interface", self.id);
            return Err(WaveError::DeviceRequestFailed("adapter common interface unavailable".into()));
        };

        let slot = adapter.wave_slots().claim(self.id)?;
        let pins = Arc::new(PinInstances::new(descriptors::streaming_pin_limits(slot, &self.config)));
        *self.listener.lock() = ListenerRecord::default();

        lifecycle.binding = Some(Binding {
            adapter,
            port,
            slot,
            pins,
        });
        lifecycle.state = MiniportState::Initialized;
        info!("{}: initialized on {}", self.id, slot);
        Ok(())
    }

    /// Releases the port, vacates the slot and drops the adapter reference.
    ///
    /// Does nothing unless the miniport is initialised, so it is safe to call
    /// more than once.
    pub fn teardown(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if !lifecycle.state.is_initialized() {
            if lifecycle.state.is_destroyed() {
                warn!("{}: teardown on a destroyed miniport ignored", self.id);
            } else {
                trace!("{}: teardown before init ignored", self.id);
            }
            return;
        }
        lifecycle.state = MiniportState::Destroyed;
        let Some(binding) = lifecycle.binding.take() else {
            return;
        };
        drop(lifecycle);

        let Binding { adapter, port, slot, .. } = binding;
        drop(port);
        if adapter.wave_slots().release(self.id).is_none() {
            warn!("{}: {} was not held in the slot table", self.id, slot);
        }
        info!("{}: torn down, {} released", self.id, slot);
    }

    pub(crate) fn try_bound(&self) -> Option<BoundView> {
        let lifecycle = self.lifecycle.lock();
        if !lifecycle.state.is_initialized() {
            return None;
        }
        lifecycle.binding.as_ref().map(|b| BoundView {
            adapter: Arc::clone(&b.adapter),
            port: Arc::clone(&b.port),
            slot: b.slot,
            pins: Arc::clone(&b.pins),
        })
    }

    pub(crate) fn bound(&self) -> Result<BoundView, WaveError> {
        self.try_bound().ok_or_else(|| {
            let state = self.state();
            warn!("{}: call on a {:?} miniport", self.id, state);
            WaveError::InvalidParameter(format!("miniport is {:?}", state))
        })
    }

    pub(crate) fn capabilities(&self) -> Result<AdapterCapabilities, WaveError> {
        Ok(self.bound()?.adapter.capabilities())
    }

    /// Filter, pin and topology description for this miniport's slot.
    pub fn description(&self) -> Result<FilterDescriptor, WaveError> {
        let view = self.bound()?;
        let caps = view.adapter.capabilities();
        trace!("{}: description for {} ({:?})", self.id, view.slot, caps);
        Ok(descriptors::filter_descriptor(view.slot, &caps, &self.config))
    }

    fn pin_role(slot: WaveSlot, pin_id: u32) -> PinRole {
        if slot.is_hifi() && pin_id == PIN_SPDIF {
            PinRole::Spdif
        } else {
            PinRole::Wave
        }
    }

    /// Negotiates a format for `pin_id` into `out`; see [`intersection::intersect`].
    ///
    /// An empty `out` probes for the required size.
    pub fn data_range_intersection(
        &self,
        pin_id: u32,
        client: &DataRange,
        device: &DataRange,
        out: &mut [u8],
    ) -> Result<usize, WaveError> {
        let view = self.bound()?;
        if view.pins.count(pin_id).is_none() {
            return Err(WaveError::InvalidParameter(format!("pin {} does not stream", pin_id)));
        }
        let policy = NegotiationPolicy {
            take_device_maximum: view.adapter.capabilities().is_vista,
        };
        intersection::intersect_into(Self::pin_role(view.slot, pin_id), client, device, policy, out)
    }

    /// Opens a stream on `pin_id` for an already negotiated `format`.
    pub fn new_stream(
        &self,
        pin_id: u32,
        capture: bool,
        format: &DataFormat,
        pool: PoolType,
    ) -> Result<NewStream, WaveError> {
        let view = self.bound()?;
        let is_capture_pin = view.slot.is_hifi() && pin_id == PIN_WAVE_IN;
        if capture != is_capture_pin {
            warn!("{}: pin {} opened with capture={}", self.id, pin_id, capture);
            return Err(WaveError::InvalidParameter(format!(
                "pin {} does not stream in that direction",
                pin_id
            )));
        }
        if format.wave.is_compressed() && Self::pin_role(view.slot, pin_id) != PinRole::Spdif {
            warn!("{}: compressed stream requested on pin {}", self.id, pin_id);
            return Err(WaveError::InvalidParameter("AC-3 streams need the spdif pin".into()));
        }

        let hardware = view.adapter.hardware();
        StreamFactory::new(hardware, view.port, &view.pins).create(pin_id, capture, format, pool)
    }

    pub fn pin_count(&self, pin_id: u32) -> Option<PinCount> {
        self.bound().ok()?.pins.count(pin_id)
    }

    /// Interfaces this miniport answers for.
    pub fn query_capability(&self, capability: Capability) -> Result<(), WaveError> {
        match capability {
            Capability::Unknown
            | Capability::Miniport
            | Capability::MiniportWaveCyclic
            | Capability::PowerNotify
            | Capability::PinCount => Ok(()),
            Capability::MiniportDMus => {
                debug!("{}: music-synth interface requested", self.id);
                Err(WaveError::InvalidParameter("not a music-synth miniport".into()))
            }
            other => {
                warn!("{}: unknown interface {:?} requested", self.id, other);
                Err(WaveError::InvalidParameter(format!("{:?} not provided", other)))
            }
        }
    }

    pub fn listener(&self) -> ListenerRecord {
        *self.listener.lock()
    }

    pub fn update_listener(&self, update: impl FnOnce(&mut ListenerRecord)) {
        update(&mut self.listener.lock());
    }
}

impl Drop for MiniportWave {
    fn drop(&mut self) {
        if self.lifecycle.get_mut().state.is_initialized() {
            self.teardown();
        }
    }
}
