//! Recording collaborators for unit tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::AdapterCapabilities;
use crate::models::error::WaveError;
use crate::models::format::NegotiatedFormat;
use crate::models::power::HardwarePowerLevel;
use crate::models::property::{PropertyId, PropertyRequest};
use crate::registry::slot_table::SlotTable;
use crate::traits::adapter_common::{AdapterCommon, UnknownAdapter};
use crate::traits::hardware::{DmaChannelId, Hardware, ServiceGroupId};
use crate::traits::port::WavePort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardwareCall {
    SetPower(HardwarePowerLevel),
    OpenDma { pin_id: u32, capture: bool },
    OpenServiceGroup,
    SetDmaRunning(DmaChannelId, bool),
    CloseDma(DmaChannelId),
}

/// Everything the adapter and its hardware saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ConnectInterrupts,
    DisconnectInterrupts,
    Hardware(HardwareCall),
}

type Journal = Arc<Mutex<Vec<Event>>>;

pub struct MockHardware {
    journal: Journal,
    next_handle: AtomicU32,
    fail_groups: AtomicBool,
}

impl MockHardware {
    fn record(&self, call: HardwareCall) {
        self.journal.lock().push(Event::Hardware(call));
    }

    pub fn calls(&self) -> Vec<HardwareCall> {
        self.journal
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Hardware(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fail_service_groups(&self, fail: bool) {
        self.fail_groups.store(fail, Ordering::SeqCst);
    }
}

impl Hardware for MockHardware {
    fn set_power_state(&self, level: HardwarePowerLevel) {
        self.record(HardwareCall::SetPower(level));
    }

    fn open_dma_channel(
        &self,
        pin_id: u32,
        capture: bool,
        _format: &NegotiatedFormat,
    ) -> Result<DmaChannelId, WaveError> {
        self.record(HardwareCall::OpenDma { pin_id, capture });
        Ok(DmaChannelId(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn open_service_group(&self) -> Result<ServiceGroupId, WaveError> {
        self.record(HardwareCall::OpenServiceGroup);
        if self.fail_groups.load(Ordering::SeqCst) {
            return Err(WaveError::InsufficientResources("no service group".into()));
        }
        Ok(ServiceGroupId(self.next_handle.fetch_add(1, Ordering::SeqCst)))
    }

    fn set_dma_running(&self, channel: DmaChannelId, running: bool) -> Result<(), WaveError> {
        self.record(HardwareCall::SetDmaRunning(channel, running));
        Ok(())
    }

    fn close_dma_channel(&self, channel: DmaChannelId) {
        self.record(HardwareCall::CloseDma(channel));
    }
}

pub struct MockAdapter {
    caps: AdapterCapabilities,
    hardware: Arc<MockHardware>,
    slots: SlotTable,
    journal: Journal,
    private_requests: Mutex<Vec<u32>>,
}

impl MockAdapter {
    pub fn new(caps: AdapterCapabilities) -> Arc<Self> {
        let journal: Journal = Arc::default();
        Arc::new(Self {
            caps,
            hardware: Arc::new(MockHardware {
                journal: Arc::clone(&journal),
                next_handle: AtomicU32::new(1),
                fail_groups: AtomicBool::new(false),
            }),
            slots: SlotTable::new(),
            journal,
            private_requests: Mutex::default(),
        })
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn hardware_mock(&self) -> Arc<MockHardware> {
        Arc::clone(&self.hardware)
    }

    pub fn events(&self) -> Vec<Event> {
        self.journal.lock().clone()
    }

    pub fn private_requests(&self) -> Vec<u32> {
        self.private_requests.lock().clone()
    }
}

impl AdapterCommon for MockAdapter {
    fn capabilities(&self) -> AdapterCapabilities {
        self.caps
    }

    fn hardware(&self) -> Arc<dyn Hardware> {
        self.hardware.clone()
    }

    fn wave_slots(&self) -> &SlotTable {
        &self.slots
    }

    fn connect_interrupts(&self) -> Result<(), WaveError> {
        self.journal.lock().push(Event::ConnectInterrupts);
        Ok(())
    }

    fn disconnect_interrupts(&self) {
        self.journal.lock().push(Event::DisconnectInterrupts);
    }

    fn private_property(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        if let PropertyId::Private(id) = request.id {
            self.private_requests.lock().push(id);
        }
        request.write_u32(0)
    }
}

/// An adapter object without the common interface.
pub struct NotCommon;

impl UnknownAdapter for NotCommon {
    fn adapter_common(&self) -> Option<Arc<dyn AdapterCommon>> {
        None
    }
}

#[derive(Default)]
pub struct MockPort {
    notifications: Mutex<Vec<ServiceGroupId>>,
}

impl MockPort {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<ServiceGroupId> {
        self.notifications.lock().clone()
    }
}

impl WavePort for MockPort {
    fn notify(&self, group: ServiceGroupId) {
        self.notifications.lock().push(group);
    }
}
