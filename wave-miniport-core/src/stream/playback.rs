use log::{debug, trace};
use parking_lot::Mutex;

use crate::models::capability::Capability;
use crate::models::error::WaveError;
use crate::models::format::NegotiatedFormat;
use crate::models::guids::{KSPROPTYPESETID_GENERAL, VT_I4, VT_UI4};
use crate::models::property::{PropertyDescription, PropertyRequest, PropertyVerb, PROPERTY_DESCRIPTION_SIZE};
use crate::stream::{StreamBinding, StreamCore};

/// Quietest volume level, in 1/65536 dB.
pub const VOLUME_MINIMUM: i32 = -96 * 65536;
/// Loudest volume level (unity gain).
pub const VOLUME_MAXIMUM: i32 = 0;
/// Half a decibel.
pub const VOLUME_STEPPING: u32 = 32768;

const KSPROPERTY_MEMBER_STEPPEDRANGES: u32 = 2;
const MEMBERS_HEADER_SIZE: usize = 16;
const STEPPING_LONG_SIZE: usize = 16;
const VOLUME_DESCRIPTION_SIZE: usize = PROPERTY_DESCRIPTION_SIZE + MEMBERS_HEADER_SIZE + STEPPING_LONG_SIZE;

// Both range ends are whole steps, so a snapped in-range level stays in range.
fn snap_to_step(level: i32) -> i32 {
    let step = VOLUME_STEPPING as i32;
    (level + step / 2).div_euclid(step) * step
}

/// Render stream on a playback or SPDIF pin.
pub struct PlaybackStream {
    pub(crate) core: StreamCore,
    volume: Mutex<Vec<i32>>,
}

impl PlaybackStream {
    pub fn init(binding: StreamBinding, format: &NegotiatedFormat) -> Result<Self, WaveError> {
        let core = StreamCore::open(binding, false, format)?;
        Ok(Self {
            volume: Mutex::new(vec![VOLUME_MAXIMUM; usize::from(format.channels)]),
            core,
        })
    }

    pub(crate) fn interrupt_service(&self) {
        self.core.interrupt_service();
    }

    pub(crate) fn supports(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::Unknown | Capability::MiniportWaveCyclicStream | Capability::DrmAudioStream
        )
    }

    pub fn volume(&self, channel: u32) -> Option<i32> {
        self.volume.lock().get(channel as usize).copied()
    }

    /// Sets a channel's level, clamped to the supported range and snapped to the
    /// nearest step; returns the applied level.
    pub fn set_volume(&self, channel: u32, level: i32) -> Result<i32, WaveError> {
        let mut volume = self.volume.lock();
        let slot = volume
            .get_mut(channel as usize)
            .ok_or_else(|| WaveError::InvalidParameter(format!("no channel {}", channel)))?;
        *slot = snap_to_step(level.clamp(VOLUME_MINIMUM, VOLUME_MAXIMUM));
        trace!("pin {}: channel {} volume {}", self.core.instance.pin_id(), channel, *slot);
        Ok(*slot)
    }

    /// Sampling-rate property: reports the negotiated rate, accepts only that rate.
    pub fn sampling_rate_property(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        let rate = self.core.format.samples_per_sec;
        if request.verb.contains(PropertyVerb::GET) {
            return request.write_u32(rate);
        }
        if request.verb.contains(PropertyVerb::SET) {
            let requested = request.read_u32()?;
            if requested != rate {
                debug!("pin {}: sampling rate {} refused, stream runs at {}", self.core.instance.pin_id(), requested, rate);
                return Err(WaveError::InvalidParameter(format!("sampling rate {} not supported", requested)));
            }
            return Ok(());
        }
        if request.verb.contains(PropertyVerb::BASICSUPPORT) {
            return request.write_basic_support(&PropertyDescription {
                access_flags: PropertyVerb::BASICSUPPORT | PropertyVerb::GET | PropertyVerb::SET,
                prop_type_set: KSPROPTYPESETID_GENERAL,
                prop_type_id: VT_UI4,
                members_list_count: 0,
            });
        }
        Err(WaveError::InvalidDeviceRequest(format!("verb {:#x}", request.verb.bits())))
    }

    /// Volume property: per-channel level addressed by `request.channel`.
    pub fn volume_property(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        if request.verb.contains(PropertyVerb::BASICSUPPORT) {
            return self.volume_basic_support(request);
        }
        let channel = request
            .channel
            .ok_or_else(|| WaveError::InvalidParameter("volume request without channel".into()))?;
        if request.verb.contains(PropertyVerb::GET) {
            let level = self
                .volume(channel)
                .ok_or_else(|| WaveError::InvalidParameter(format!("no channel {}", channel)))?;
            return request.write_i32(level);
        }
        if request.verb.contains(PropertyVerb::SET) {
            let level = request.read_i32()?;
            self.set_volume(channel, level)?;
            return Ok(());
        }
        Err(WaveError::InvalidDeviceRequest(format!("verb {:#x}", request.verb.bits())))
    }

    fn volume_basic_support(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        let description = PropertyDescription {
            access_flags: PropertyVerb::BASICSUPPORT | PropertyVerb::GET | PropertyVerb::SET,
            prop_type_set: KSPROPTYPESETID_GENERAL,
            prop_type_id: VT_I4,
            members_list_count: 1,
        };
        if request.advertised()? < VOLUME_DESCRIPTION_SIZE {
            return request.write_basic_support(&description);
        }

        let mut out = [0u8; VOLUME_DESCRIPTION_SIZE];
        out[..PROPERTY_DESCRIPTION_SIZE].copy_from_slice(&description.to_bytes());
        out[4..8].copy_from_slice(&(VOLUME_DESCRIPTION_SIZE as u32).to_le_bytes());

        let members = &mut out[PROPERTY_DESCRIPTION_SIZE..];
        members[0..4].copy_from_slice(&KSPROPERTY_MEMBER_STEPPEDRANGES.to_le_bytes());
        members[4..8].copy_from_slice(&(STEPPING_LONG_SIZE as u32).to_le_bytes());
        members[8..12].copy_from_slice(&1u32.to_le_bytes());
        members[16..20].copy_from_slice(&VOLUME_STEPPING.to_le_bytes());
        members[24..28].copy_from_slice(&VOLUME_MINIMUM.to_le_bytes());
        members[28..32].copy_from_slice(&VOLUME_MAXIMUM.to_le_bytes());
        request.write_bytes(&out)
    }
}
