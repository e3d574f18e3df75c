use log::{debug, error, info, trace};

use crate::miniport::wave::MiniportWave;
use crate::models::power::DevicePowerState;

impl MiniportWave {
    /// Applies a device power transition.
    ///
    /// Only the HiFi slot drives the chip; the other slots share its power
    /// domain and just record the state. Interrupts are disconnected before
    /// the chip leaves D0 and reconnected after it is back at full power.
    pub fn power_change_notify(&self, new_state: DevicePowerState) {
        let mut current = self.power_state.lock();
        if *current == new_state {
            trace!("{}: already in {:?}", self.id(), new_state);
            return;
        }

        let Some(view) = self.try_bound().filter(|v| v.slot.is_hifi()) else {
            debug!("{}: {:?} -> {:?} recorded only", self.id(), *current, new_state);
            *current = new_state;
            return;
        };

        let hardware = view.adapter.hardware();
        info!("{}: power {:?} -> {:?}", self.id(), *current, new_state);
        *current = new_state;
        if new_state.is_working() {
            hardware.set_power_state(new_state.hardware_level());
            if let Err(e) = view.adapter.connect_interrupts() {
                error!("{}: failed to reconnect interrupts: {}", self.id(), e);
            }
        } else {
            view.adapter.disconnect_interrupts();
            hardware.set_power_state(new_state.hardware_level());
        }
    }
}
