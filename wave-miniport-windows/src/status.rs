//! `NTSTATUS` conversion for results handed back to the port driver.

use windows::Win32::Foundation::NTSTATUS;

use wave_miniport_core::models::error::{status_of, WaveError};

/// Status code the port driver expects for `err`.
pub fn to_ntstatus(err: &WaveError) -> NTSTATUS {
    NTSTATUS(err.nt_status())
}

/// Status code for a whole result; `STATUS_SUCCESS` on `Ok`.
pub fn result_to_ntstatus<T>(result: &Result<T, WaveError>) -> NTSTATUS {
    if let Err(e) = result {
        log::debug!("returning {:#010x} to the port: {}", e.nt_status() as u32, e);
    }
    NTSTATUS(status_of(result))
}
