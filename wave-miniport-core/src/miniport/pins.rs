use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::models::error::WaveError;

/// Open/possible instance counts of one pin, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinCount {
    pub current: u32,
    pub possible: u32,
}

#[derive(Debug)]
struct PinCounter {
    pin_id: u32,
    possible: u32,
    current: AtomicU32,
}

/// Per-pin instance limits for one miniport.
#[derive(Debug, Default)]
pub struct PinInstances {
    counters: Vec<Arc<PinCounter>>,
}

impl PinInstances {
    /// Builds counters from `(pin_id, possible)` pairs of the streaming pins.
    pub fn new(limits: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let counters = limits
            .into_iter()
            .map(|(pin_id, possible)| {
                Arc::new(PinCounter {
                    pin_id,
                    possible,
                    current: AtomicU32::new(0),
                })
            })
            .collect();
        Self { counters }
    }

    fn counter(&self, pin_id: u32) -> Option<&Arc<PinCounter>> {
        self.counters.iter().find(|c| c.pin_id == pin_id)
    }

    pub fn count(&self, pin_id: u32) -> Option<PinCount> {
        self.counter(pin_id).map(|c| PinCount {
            current: c.current.load(Ordering::Acquire),
            possible: c.possible,
        })
    }

    /// Takes one instance of `pin_id`; the returned guard gives it back on drop.
    pub fn reserve(&self, pin_id: u32) -> Result<PinInstance, WaveError> {
        let counter = self
            .counter(pin_id)
            .ok_or_else(|| WaveError::InvalidParameter(format!("pin {} is not a streaming pin", pin_id)))?;
        counter
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < counter.possible).then_some(n + 1))
            .map_err(|n| {
                warn!("pin {}: all {} instances in use", pin_id, n);
                WaveError::InsufficientResources(format!("pin {} has no free instance", pin_id))
            })?;
        debug!("pin {}: instance reserved", pin_id);
        Ok(PinInstance {
            counter: Arc::clone(counter),
        })
    }
}

/// One reserved pin instance, held by a stream for its lifetime.
#[derive(Debug)]
pub struct PinInstance {
    counter: Arc<PinCounter>,
}

impl PinInstance {
    pub fn pin_id(&self) -> u32 {
        self.counter.pin_id
    }
}

impl Drop for PinInstance {
    fn drop(&mut self) {
        self.counter.current.fetch_sub(1, Ordering::AcqRel);
    }
}
