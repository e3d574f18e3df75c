use thiserror::Error;

/// Errors reported back to the host by miniport entry points.
///
/// Every variant maps to exactly one kernel status code via [`WaveError::nt_status`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaveError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Size-only probe: the caller passed a zero-length buffer.
    #[error("buffer overflow, {required} bytes required")]
    BufferOverflow { required: usize },

    #[error("buffer too small, {required} bytes required")]
    BufferTooSmall { required: usize },

    #[error("no match: {0}")]
    NoMatch(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("insufficient resources: {0}")]
    InsufficientResources(String),

    #[error("invalid device request: {0}")]
    InvalidDeviceRequest(String),

    #[error("device request failed: {0}")]
    DeviceRequestFailed(String),
}

pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_BUFFER_OVERFLOW: i32 = 0x8000_0005_u32 as i32;
pub const STATUS_UNSUCCESSFUL: i32 = 0xC000_0001_u32 as i32;
pub const STATUS_NOT_IMPLEMENTED: i32 = 0xC000_0002_u32 as i32;
pub const STATUS_INVALID_PARAMETER: i32 = 0xC000_000D_u32 as i32;
pub const STATUS_INVALID_DEVICE_REQUEST: i32 = 0xC000_0010_u32 as i32;
pub const STATUS_BUFFER_TOO_SMALL: i32 = 0xC000_0023_u32 as i32;
pub const STATUS_INSUFFICIENT_RESOURCES: i32 = 0xC000_009A_u32 as i32;
pub const STATUS_NO_MATCH: i32 = 0xC000_0272_u32 as i32;

impl WaveError {
    /// Kernel status code the host expects for this failure.
    pub fn nt_status(&self) -> i32 {
        match self {
            Self::InvalidParameter(_) => STATUS_INVALID_PARAMETER,
            Self::BufferOverflow { .. } => STATUS_BUFFER_OVERFLOW,
            Self::BufferTooSmall { .. } => STATUS_BUFFER_TOO_SMALL,
            Self::NoMatch(_) => STATUS_NO_MATCH,
            Self::NotImplemented(_) => STATUS_NOT_IMPLEMENTED,
            Self::InsufficientResources(_) => STATUS_INSUFFICIENT_RESOURCES,
            Self::InvalidDeviceRequest(_) => STATUS_INVALID_DEVICE_REQUEST,
            Self::DeviceRequestFailed(_) => STATUS_UNSUCCESSFUL,
        }
    }

    /// Size the host should retry with, for the two size-reporting variants.
    pub fn required_size(&self) -> Option<usize> {
        match self {
            Self::BufferOverflow { required } | Self::BufferTooSmall { required } => Some(*required),
            _ => None,
        }
    }
}

/// Status code for a completed call, success included.
pub fn status_of<T>(result: &Result<T, WaveError>) -> i32 {
    match result {
        Ok(_) => STATUS_SUCCESS,
        Err(e) => e.nt_status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_a_warning_status() {
        let status = WaveError::BufferOverflow { required: 104 }.nt_status();
        // Warning severity: high bit set, second bit clear.
        assert_eq!((status as u32) >> 30, 0b10);
    }

    #[test]
    fn error_statuses_are_distinct() {
        let errors = [
            WaveError::InvalidParameter(String::new()),
            WaveError::BufferOverflow { required: 0 },
            WaveError::BufferTooSmall { required: 0 },
            WaveError::NoMatch(String::new()),
            WaveError::NotImplemented(String::new()),
            WaveError::InsufficientResources(String::new()),
            WaveError::InvalidDeviceRequest(String::new()),
            WaveError::DeviceRequestFailed(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(WaveError::nt_status).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn required_size_only_for_size_variants() {
        assert_eq!(WaveError::BufferTooSmall { required: 88 }.required_size(), Some(88));
        assert_eq!(WaveError::NoMatch("x".into()).required_size(), None);
    }

    #[test]
    fn status_of_success_is_zero() {
        let ok: Result<(), WaveError> = Ok(());
        assert_eq!(status_of(&ok), STATUS_SUCCESS);
        let err: Result<(), WaveError> = Err(WaveError::NoMatch("pin".into()));
        assert_eq!(status_of(&err), STATUS_NO_MATCH);
    }
}
