//! # wave-miniport-windows
//!
//! Windows glue for wave-miniport-core.
//!
//! Provides:
//! - `status` - `WaveError` to `NTSTATUS` for the port driver
//! - `guid` - `uuid::Uuid` to `windows::core::GUID`
//! - `data_range` - `KSDATARANGE_AUDIO` to and from the core `DataRange`
//!
//! ## Usage
//! ```ignore
//! use wave_miniport_windows::{data_range, status};
//!
//! let client = data_range::from_ks(client_range);
//! let device = data_range::from_ks(device_range);
//! let result = wave.data_range_intersection(pin_id, &client, &device, out);
//! return status::result_to_ntstatus(&result);
//! ```

#[cfg(target_os = "windows")]
pub mod data_range;
#[cfg(target_os = "windows")]
pub mod guid;
#[cfg(target_os = "windows")]
pub mod status;

#[cfg(target_os = "windows")]
pub use status::{result_to_ntstatus, to_ntstatus};
