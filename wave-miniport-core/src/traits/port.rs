use crate::traits::hardware::ServiceGroupId;

/// The host port driver a miniport is bound to during `init`.
pub trait WavePort: Send + Sync {
    /// Signals that the members of `group` need servicing (called from the ISR path).
    fn notify(&self, group: ServiceGroupId);
}
