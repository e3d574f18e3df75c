use serde::{Deserialize, Serialize};

/// Device power state requested by the host power manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevicePowerState {
    D0,
    D1,
    D2,
    D3,
}

impl DevicePowerState {
    /// Hardware level the chip is driven to for this device state.
    pub fn hardware_level(self) -> HardwarePowerLevel {
        match self {
            Self::D0 => HardwarePowerLevel::Normal,
            Self::D1 | Self::D2 => HardwarePowerLevel::Sleep,
            Self::D3 => HardwarePowerLevel::Suspend,
        }
    }

    pub fn is_working(self) -> bool {
        self == Self::D0
    }
}

/// Power level understood by the hardware-abstraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwarePowerLevel {
    Normal,
    Sleep,
    Suspend,
}
