//! Property handlers of the wave filter.
//!
//! Verbs are checked in the order GET, BASICSUPPORT, SET; a request with
//! none of them is an invalid device request.

use log::{debug, trace, warn};

use crate::miniport::wave::MiniportWave;
use crate::models::error::WaveError;
use crate::models::guids::{KSPROPTYPESETID_GENERAL, VT_I4};
use crate::models::property::{PropertyDescription, PropertyId, PropertyRequest, PropertyVerb};
use crate::processing::speaker_map::{output_configuration, SpeakerMask, STEREO_SPEAKER_GEOMETRY_WIDE};
use crate::stream::PlaybackStream;

/// The wave engine never runs on the host CPU.
pub const CPU_RESOURCES_NOT_HOST_CPU: i32 = 0;

fn i32_description(access_flags: PropertyVerb) -> PropertyDescription {
    PropertyDescription {
        access_flags,
        prop_type_set: KSPROPTYPESETID_GENERAL,
        prop_type_id: VT_I4,
        members_list_count: 0,
    }
}

fn unknown_verb(name: &str, request: &PropertyRequest<'_>) -> WaveError {
    warn!("{}: unknown verb {:#x}", name, request.verb.bits());
    WaveError::InvalidDeviceRequest(format!("{}: verb {:#x}", name, request.verb.bits()))
}

/// A read-mostly LONG property: GET reports `value`, SET is accepted and only logged.
fn fixed_i32_property(name: &str, value: i32, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
    if request.verb.contains(PropertyVerb::GET) {
        trace!("{}: get -> {:#x}", name, value);
        return request.write_i32(value);
    }
    if request.verb.contains(PropertyVerb::BASICSUPPORT) {
        return request.write_basic_support(&i32_description(
            PropertyVerb::BASICSUPPORT | PropertyVerb::GET | PropertyVerb::SET,
        ));
    }
    if request.verb.contains(PropertyVerb::SET) {
        let requested = request.read_i32()?;
        if requested == value {
            trace!("{}: set {:#x}", name, requested);
        } else {
            debug!("{}: set to {:#x} ignored, stays {:#x}", name, requested, value);
        }
        return Ok(());
    }
    Err(unknown_verb(name, request))
}

fn target_playback<'a>(name: &str, request: &PropertyRequest<'a>) -> Result<&'a PlaybackStream, WaveError> {
    let Some(stream) = request.minor_target else {
        warn!("{}: no stream targeted", name);
        return Err(WaveError::InvalidParameter(format!("{} needs a stream target", name)));
    };
    stream.as_playback().ok_or_else(|| {
        warn!("{}: target is a {:?} stream", name, stream.direction());
        WaveError::InvalidParameter(format!("{} applies to playback streams only", name))
    })
}

impl MiniportWave {
    /// Routes a property request to its handler.
    pub fn handle_property(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        let result = match request.id {
            PropertyId::ChannelConfig => self.property_channel_config(request),
            PropertyId::CpuResources => self.property_cpu_resources(request),
            PropertyId::SpeakerGeometry => self.property_speaker_geometry(request),
            PropertyId::SamplingRate => self.property_sampling_rate(request),
            PropertyId::VolumeLevel => self.property_volume(request),
            PropertyId::MixLevelTable => self.property_mix_level(request),
            PropertyId::MixLevelCaps => self.property_mix_level_caps(request),
            PropertyId::Private(_) => self.property_private(request),
        };
        if let Err(e) = &result {
            debug!("{}: property {:?} failed: {}", self.id(), request.id, e);
        }
        result
    }

    /// Speaker configuration: 7.1 on the extended-channel chip, 5.1 otherwise.
    pub fn property_channel_config(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        let caps = self.capabilities()?;
        let config = output_configuration(caps.extended_channels);
        if request.verb.contains(PropertyVerb::SET) && !request.verb.contains(PropertyVerb::GET) {
            if let Ok(requested) = request.read_i32() {
                let requested = SpeakerMask::from_bits_retain(requested as u32);
                if requested != SpeakerMask::FIVE_POINT_ONE && requested != SpeakerMask::SEVEN_POINT_ONE {
                    warn!("channel config: host asked for {:#x}; set it in the control panel", requested.bits());
                }
            }
        }
        fixed_i32_property("channel config", config.bits() as i32, request)
    }

    pub fn property_cpu_resources(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        if request.verb.contains(PropertyVerb::GET) {
            trace!("cpu resources: get (node {:?})", request.node);
            return request.write_i32(CPU_RESOURCES_NOT_HOST_CPU);
        }
        if request.verb.contains(PropertyVerb::BASICSUPPORT) {
            return request.write_basic_support(&i32_description(PropertyVerb::BASICSUPPORT | PropertyVerb::GET));
        }
        Err(unknown_verb("cpu resources", request))
    }

    /// Stereo speaker geometry, always reported as wide.
    pub fn property_speaker_geometry(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        self.bound()?;
        fixed_i32_property("speaker geometry", STEREO_SPEAKER_GEOMETRY_WIDE, request)
    }

    pub fn property_sampling_rate(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        target_playback("sampling rate", request)?.sampling_rate_property(request)
    }

    pub fn property_volume(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        target_playback("volume", request)?.volume_property(request)
    }

    pub fn property_mix_level(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        warn!("mix level: verb {:#x} node {:?} not implemented", request.verb.bits(), request.node);
        Err(WaveError::NotImplemented("mix level table".into()))
    }

    pub fn property_mix_level_caps(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        warn!("mix level caps: verb {:#x} node {:?} not implemented", request.verb.bits(), request.node);
        Err(WaveError::NotImplemented("mix level caps".into()))
    }

    /// Vendor property set, serviced by the adapter.
    pub fn property_private(&self, request: &mut PropertyRequest<'_>) -> Result<(), WaveError> {
        self.bound()?.adapter.private_property(request)
    }
}
