//! # wave-miniport-core
//!
//! Platform-agnostic core of a kernel-streaming wave miniport for a
//! multi-channel sound card.
//!
//! Negotiates stream formats, describes the filter for each of the four
//! wave devices an adapter exposes, arbitrates slots and pin instances,
//! services filter properties and sequences power transitions. The
//! adapter-common object, the hardware layer and the host port plug in
//! through the traits in [`traits`].
//!
//! ## Architecture
//!
//! ```text
//! wave-miniport-core (this crate)
//! ├── traits/       ← AdapterCommon, UnknownAdapter, Hardware, WavePort
//! ├── models/       ← WaveError, DataRange, NegotiatedFormat, WaveConfig, PropertyRequest, etc.
//! ├── processing/   ← format intersection, speaker masks, KSDATAFORMAT wire encoding
//! ├── registry/     ← SlotTable (wave-device slots per adapter)
//! ├── miniport/     ← MiniportWave, descriptors, properties, power, pin instances
//! └── stream/       ← WaveStream {Capture, Playback}, StreamFactory
//! ```

pub mod miniport;
pub mod models;
pub mod processing;
pub mod registry;
pub mod stream;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use miniport::pins::PinCount;
pub use miniport::wave::{create_wave, create_wave_with_config, ListenerRecord, MiniportWave};
pub use models::capability::Capability;
pub use models::config::{AdapterCapabilities, WaveConfig};
pub use models::descriptor::FilterDescriptor;
pub use models::error::WaveError;
pub use models::format::{DataFormat, DataRange, NegotiatedFormat, Specifier, SubFormat};
pub use models::power::{DevicePowerState, HardwarePowerLevel};
pub use models::property::{PropertyId, PropertyRequest, PropertyVerb};
pub use models::resources::{PoolType, ResourceDescriptor, ResourceList};
pub use models::state::{KsState, MiniportState};
pub use processing::intersection::{intersect, intersect_into, NegotiationPolicy, PinRole};
pub use processing::speaker_map::{channel_mask_for, SpeakerMask};
pub use registry::slot_table::{MiniportId, SlotTable, WaveSlot, MAX_WAVE_DEVICES};
pub use stream::{NewStream, StreamDirection, WaveStream};
pub use traits::adapter_common::{AdapterCommon, UnknownAdapter};
pub use traits::hardware::{DmaChannelId, Hardware, ServiceGroupId};
pub use traits::port::WavePort;
